use std::sync::Arc;

use crate::cache::SubmissionCache;
use crate::source::SubmissionSource;
use crate::storage::StorageConfig;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<StorageConfig>,
    pub source: Arc<dyn SubmissionSource>,
    pub cache: Arc<SubmissionCache>,
}

impl AppState {
    /// State over the local JSONL store.
    pub fn local(storage: StorageConfig) -> Self {
        Self {
            storage: Arc::new(storage.clone()),
            source: Arc::new(crate::source::JsonlSource::new(storage)),
            cache: Arc::new(SubmissionCache::new()),
        }
    }
}
