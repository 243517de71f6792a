//! Store traits implemented by the persistence layer

use crate::{MaskedValue, RecordId};
use async_trait::async_trait;

/// Key/value option storage (holds the scrub flag)
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Deleting a missing key is not an error
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}

/// Narrow view of the comment store needed for scrubbing.
///
/// `pending_ids` and `count_pending` must select with the same predicate:
/// stored address is not string-equal to `masked`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Identifiers of comments whose address differs from `masked`, ascending
    async fn pending_ids(&self, masked: &MaskedValue) -> anyhow::Result<Vec<RecordId>>;

    async fn count_pending(&self, masked: &MaskedValue) -> anyhow::Result<u64>;

    /// Overwrite the address of one comment in a single transaction.
    /// Returns the number of rows affected.
    async fn update_address(&self, id: RecordId, masked: &MaskedValue) -> anyhow::Result<u64>;
}
