//! Storage layer for scrub
//!
//! This crate provides:
//! - SQLite comment store (implements `scrub_core::RecordStore`)
//! - SQLite option store (implements `scrub_core::OptionStore`)
//! - Migrations

pub mod db;
pub mod error;
pub mod models;
pub mod options;

pub use db::Storage;
pub use error::{Result, StorageError};
pub use models::Comment;
