//! Core domain models and logic for scrub
//!
//! This crate contains:
//! - Domain models (RecordId, MaskedValue, NewComment)
//! - Store traits the host persistence layer implements
//! - Configuration gate, record locator, record mutator
//! - Batch scrubbing engine (shared by the admin and CLI callers)
//! - Write-path interceptor and lifecycle hooks

pub mod engine;
pub mod error;
pub mod gate;
pub mod intercept;
pub mod lifecycle;
pub mod locator;
pub mod memory;
pub mod mutator;
pub mod record;
pub mod store;

pub use engine::{
    BatchEngine, BatchMode, BatchOptions, BatchOutcome, CancelFlag, NoProgress, ProgressSink,
};
pub use error::{Result, ScrubError};
pub use gate::{ScrubFlag, ScrubGate, sanitize_flag_input};
pub use intercept::CommentInterceptor;
pub use locator::{RecordLocator, WorkSet};
pub use mutator::RecordMutator;
pub use record::{MaskedValue, NewComment, RecordId, DEFAULT_MASKED_IP};
pub use store::{OptionStore, RecordStore};

/// Option key holding the scrub flag.
pub const OPTION_KEY: &str = "scrub_comment_author_ip";

/// Stored value meaning "scrubbing enabled".
pub const ENABLED_SENTINEL: &str = "yes";

/// Stored value meaning "scrubbing disabled".
pub const DISABLED_SENTINEL: &str = "no";
