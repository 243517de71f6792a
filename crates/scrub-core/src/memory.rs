//! In-memory stores with failure injection, for tests and dry runs

use crate::{MaskedValue, OptionStore, RecordId, RecordStore};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryOptionStore {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl OptionStore for MemoryOptionStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("option store unavailable");
        }
        Ok(self
            .values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.insert(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
        Ok(())
    }
}

/// Comment addresses keyed by id
#[derive(Default)]
pub struct MemoryRecordStore {
    addresses: Mutex<BTreeMap<RecordId, String>>,
    failing: Mutex<HashSet<RecordId>>,
    fail_queries: AtomicBool,
    attempted: Mutex<Vec<RecordId>>,
    calls: AtomicUsize,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (u64, S)>,
        S: Into<String>,
    {
        let store = Self::new();
        for (id, address) in records {
            store.insert(RecordId(id), address);
        }
        store
    }

    pub fn insert(&self, id: RecordId, address: impl Into<String>) {
        self.addresses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, address.into());
    }

    pub fn address(&self, id: RecordId) -> Option<String> {
        self.addresses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Make every update of `id` fail with a store error
    pub fn fail_updates_for(&self, id: RecordId) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Ids passed to `update_address`, in call order
    pub fn attempted(&self) -> Vec<RecordId> {
        self.attempted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Total number of trait calls made against this store
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn pending(&self, masked: &MaskedValue) -> anyhow::Result<Vec<RecordId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries.load(Ordering::SeqCst) {
            anyhow::bail!("record store unavailable");
        }
        Ok(self
            .addresses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(_, address)| !masked.matches(address))
            .map(|(id, _)| *id)
            .collect())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn pending_ids(&self, masked: &MaskedValue) -> anyhow::Result<Vec<RecordId>> {
        self.pending(masked)
    }

    async fn count_pending(&self, masked: &MaskedValue) -> anyhow::Result<u64> {
        Ok(self.pending(masked)?.len() as u64)
    }

    async fn update_address(&self, id: RecordId, masked: &MaskedValue) -> anyhow::Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.attempted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(id);

        if self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&id)
        {
            anyhow::bail!("simulated write failure for comment {}", id);
        }

        let mut addresses = self.addresses.lock().unwrap_or_else(|e| e.into_inner());
        match addresses.get_mut(&id) {
            Some(address) => {
                *address = masked.as_str().to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
