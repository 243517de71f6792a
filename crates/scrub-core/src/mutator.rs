//! Record mutator: one transactional address overwrite

use crate::{MaskedValue, RecordId, RecordStore, Result, ScrubError, ScrubGate};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub struct RecordMutator {
    store: Arc<dyn RecordStore>,
    gate: ScrubGate,
}

impl RecordMutator {
    pub fn new(store: Arc<dyn RecordStore>, gate: ScrubGate) -> Self {
        Self { store, gate }
    }

    pub fn gate(&self) -> &ScrubGate {
        &self.gate
    }

    /// Overwrite the address of one comment.
    ///
    /// Refuses to run when scrubbing is disabled, since the write path calls
    /// this directly without going through the engine.
    pub async fn scrub_one(&self, id: RecordId, target: Option<&MaskedValue>) -> Result<bool> {
        if !id.is_valid() {
            return Err(ScrubError::InvalidArgument(
                "a comment ID is required".to_string(),
            ));
        }

        if !self.gate.is_enabled().await {
            return Err(ScrubError::NotEnabled);
        }

        match target {
            Some(target) => self.write(id, target).await,
            None => self.write(id, &self.gate.masked_value()).await,
        }
    }

    /// Unconditional overwrite without the gate check; the engine checks once per batch.
    pub(crate) async fn write(&self, id: RecordId, target: &MaskedValue) -> Result<bool> {
        if !id.is_valid() {
            return Err(ScrubError::InvalidArgument(
                "a comment ID is required".to_string(),
            ));
        }

        let rows = self
            .store
            .update_address(id, target)
            .await
            .map_err(|e| ScrubError::UpdateFailed {
                id,
                detail: e.to_string(),
            })?;

        if rows == 0 {
            return Err(ScrubError::UpdateFailed {
                id,
                detail: "no comment matched".to_string(),
            });
        }

        debug!(%id, masked = %target, "scrubbed comment address");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OPTION_KEY;
    use crate::memory::{MemoryOptionStore, MemoryRecordStore};

    fn mutator(store: Arc<MemoryRecordStore>, enabled: bool) -> RecordMutator {
        let options = MemoryOptionStore::new();
        options.insert(OPTION_KEY, if enabled { "yes" } else { "no" });
        RecordMutator::new(store, ScrubGate::new(Arc::new(options)))
    }

    #[tokio::test]
    async fn test_scrub_one_overwrites_address() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "203.0.113.9")]));
        let m = mutator(store.clone(), true);

        assert!(m.scrub_one(RecordId(1), None).await.unwrap());
        assert_eq!(store.address(RecordId(1)).as_deref(), Some("127.0.0.1"));
    }

    #[tokio::test]
    async fn test_scrub_one_uses_explicit_target() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "203.0.113.9")]));
        let m = mutator(store.clone(), true);
        let target = MaskedValue::parse("10.0.0.5").unwrap();

        m.scrub_one(RecordId(1), Some(&target)).await.unwrap();
        assert_eq!(store.address(RecordId(1)).as_deref(), Some("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_overwrite_is_unconditional() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "127.0.0.1")]));
        let m = mutator(store.clone(), true);

        assert!(m.scrub_one(RecordId(1), None).await.unwrap());
        assert_eq!(store.attempted(), vec![RecordId(1)]);
    }

    #[tokio::test]
    async fn test_zero_id_is_invalid() {
        let store = Arc::new(MemoryRecordStore::new());
        let m = mutator(store.clone(), true);

        assert!(matches!(
            m.scrub_one(RecordId(0), None).await,
            Err(ScrubError::InvalidArgument(_))
        ));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_disabled_gate_does_not_touch_store() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "203.0.113.9")]));
        let m = mutator(store.clone(), false);

        assert!(matches!(
            m.scrub_one(RecordId(1), None).await,
            Err(ScrubError::NotEnabled)
        ));
        assert_eq!(store.calls(), 0);
        assert_eq!(store.address(RecordId(1)).as_deref(), Some("203.0.113.9"));
    }

    #[tokio::test]
    async fn test_missing_record_is_update_failure() {
        let store = Arc::new(MemoryRecordStore::new());
        let m = mutator(store, true);

        match m.scrub_one(RecordId(42), None).await {
            Err(ScrubError::UpdateFailed { id, detail }) => {
                assert_eq!(id, RecordId(42));
                assert_eq!(detail, "no comment matched");
            }
            other => panic!("expected UpdateFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_error_carries_detail() {
        let store = Arc::new(MemoryRecordStore::with_records([(3, "203.0.113.9")]));
        store.fail_updates_for(RecordId(3));
        let m = mutator(store, true);

        match m.scrub_one(RecordId(3), None).await {
            Err(ScrubError::UpdateFailed { detail, .. }) => {
                assert!(detail.contains("simulated write failure"));
            }
            other => panic!("expected UpdateFailed, got {:?}", other),
        }
    }
}
