pub mod cleanup;
pub mod completions;
pub mod flag;
pub mod lifecycle;
pub mod serve;

use scrub_config::Config;
use scrub_core::{BatchEngine, OptionStore, RecordLocator, RecordMutator, RecordStore, ScrubGate};
use scrub_storage::Storage;
use std::sync::Arc;

/// Store, gate and scrub components shared by every command
pub struct Context {
    pub storage: Storage,
    pub config: Config,
    pub masked_ip: Option<String>,
    pub gate: ScrubGate,
    pub locator: RecordLocator,
    pub engine: BatchEngine,
}

impl Context {
    pub fn new(storage: Storage, config: Config, masked_ip: Option<String>) -> Self {
        let store = Arc::new(storage.clone());
        Self::with_stores(storage, store.clone(), store, config, masked_ip)
    }

    pub fn with_stores(
        storage: Storage,
        records: Arc<dyn RecordStore>,
        options: Arc<dyn OptionStore>,
        config: Config,
        masked_ip: Option<String>,
    ) -> Self {
        let gate = ScrubGate::new(options).with_masked_override(masked_ip.clone());
        let mutator = RecordMutator::new(records.clone(), gate.clone());

        Self {
            locator: RecordLocator::new(records, gate.clone()),
            engine: BatchEngine::new(mutator),
            storage,
            config,
            masked_ip,
            gate,
        }
    }
}
