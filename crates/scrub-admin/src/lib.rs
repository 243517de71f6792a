//! Interactive admin surface: settings view, nonce-checked bulk cleanup and
//! the comment submission endpoint.

pub mod nonce;
pub mod notice;
pub mod server;

pub use notice::BulkResult;
pub use server::AdminServer;
