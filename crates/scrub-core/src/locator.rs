//! Record locator: which comments still carry a real address

use crate::{RecordId, RecordStore, Result, ScrubError, ScrubGate};
use std::sync::Arc;
use tracing::debug;

/// Result of a pending-record lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkSet {
    /// Every stored address already equals the masked value
    Empty,
    Pending(Vec<RecordId>),
}

impl WorkSet {
    pub fn is_empty(&self) -> bool {
        matches!(self, WorkSet::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            WorkSet::Empty => 0,
            WorkSet::Pending(ids) => ids.len(),
        }
    }

    pub fn ids(&self) -> &[RecordId] {
        match self {
            WorkSet::Empty => &[],
            WorkSet::Pending(ids) => ids,
        }
    }

    pub fn into_ids(self) -> Vec<RecordId> {
        match self {
            WorkSet::Empty => Vec::new(),
            WorkSet::Pending(ids) => ids,
        }
    }
}

pub struct RecordLocator {
    store: Arc<dyn RecordStore>,
    gate: ScrubGate,
}

impl RecordLocator {
    pub fn new(store: Arc<dyn RecordStore>, gate: ScrubGate) -> Self {
        Self { store, gate }
    }

    pub async fn find_pending(&self) -> Result<WorkSet> {
        let masked = self.gate.masked_value();
        let ids = self
            .store
            .pending_ids(&masked)
            .await
            .map_err(|e| ScrubError::QueryFailed(e.to_string()))?;

        debug!(pending = ids.len(), masked = %masked, "located pending comments");

        if ids.is_empty() {
            Ok(WorkSet::Empty)
        } else {
            Ok(WorkSet::Pending(ids))
        }
    }

    /// Same predicate as `find_pending`, without materialising the ids
    pub async fn count_pending(&self) -> Result<u64> {
        let masked = self.gate.masked_value();
        self.store
            .count_pending(&masked)
            .await
            .map_err(|e| ScrubError::QueryFailed(e.to_string()))
    }
}
