//! Write-path interceptor for newly submitted comments

use crate::{NewComment, RecordId, RecordMutator, Result};
use tracing::debug;

pub struct CommentInterceptor {
    mutator: RecordMutator,
}

impl CommentInterceptor {
    pub fn new(mutator: RecordMutator) -> Self {
        Self { mutator }
    }

    /// Replace the submitted address before the comment is persisted.
    /// Returns false (comment untouched) when scrubbing is disabled.
    pub async fn preprocess(&self, comment: &mut NewComment) -> bool {
        let gate = self.mutator.gate();
        if !gate.is_enabled().await {
            return false;
        }
        comment.author_ip = gate.masked_value().as_str().to_string();
        true
    }

    /// Check the persisted address and correct it through the mutator if
    /// something overwrote it after `preprocess`. Returns true when a
    /// correction was written.
    pub async fn confirm(&self, id: RecordId, stored_ip: &str) -> Result<bool> {
        let gate = self.mutator.gate();
        if !gate.is_enabled().await {
            return Ok(false);
        }

        let masked = gate.masked_value();
        if !stored_ip.is_empty() && masked.matches(stored_ip) {
            return Ok(false);
        }

        debug!(%id, "stored address differs from mask, correcting");
        self.mutator.scrub_one(id, Some(&masked)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryOptionStore, MemoryRecordStore};
    use crate::{OPTION_KEY, ScrubGate};
    use std::sync::Arc;

    fn interceptor(store: Arc<MemoryRecordStore>, enabled: bool) -> CommentInterceptor {
        let options = MemoryOptionStore::new();
        options.insert(OPTION_KEY, if enabled { "yes" } else { "no" });
        let gate = ScrubGate::new(Arc::new(options))
            .with_masked_override(Some("10.0.0.5".to_string()));
        CommentInterceptor::new(RecordMutator::new(store, gate))
    }

    fn comment(ip: &str) -> NewComment {
        NewComment {
            author: "reader".to_string(),
            author_ip: ip.to_string(),
            content: "hello".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_preprocess_masks_when_enabled() {
        let i = interceptor(Arc::new(MemoryRecordStore::new()), true);
        let mut c = comment("198.51.100.7");

        assert!(i.preprocess(&mut c).await);
        assert_eq!(c.author_ip, "10.0.0.5");
    }

    #[tokio::test]
    async fn test_preprocess_leaves_comment_when_disabled() {
        let i = interceptor(Arc::new(MemoryRecordStore::new()), false);
        let mut c = comment("198.51.100.7");

        assert!(!i.preprocess(&mut c).await);
        assert_eq!(c.author_ip, "198.51.100.7");
    }

    #[tokio::test]
    async fn test_confirm_skips_already_masked() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "10.0.0.5")]));
        let i = interceptor(store.clone(), true);

        assert!(!i.confirm(RecordId(1), "10.0.0.5").await.unwrap());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_confirm_corrects_overwritten_address() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "198.51.100.7")]));
        let i = interceptor(store.clone(), true);

        assert!(i.confirm(RecordId(1), "198.51.100.7").await.unwrap());
        assert_eq!(store.address(RecordId(1)).as_deref(), Some("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_confirm_corrects_empty_address() {
        let store = Arc::new(MemoryRecordStore::with_records([(1, "")]));
        let i = interceptor(store.clone(), true);

        assert!(i.confirm(RecordId(1), "").await.unwrap());
        assert_eq!(store.address(RecordId(1)).as_deref(), Some("10.0.0.5"));
    }
}
