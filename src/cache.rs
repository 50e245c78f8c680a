//! Per-game submission cache.
//!
//! Boards are recomputed per request, but the normalized submission set for
//! a game is cached so repeated board views don't re-fetch and re-normalize.
//! Entries are keyed by (game, record type) and shared as `Arc` slices; the
//! engine never mutates its input, so a cached set can back any number of
//! concurrent board computations.
//!
//! Invalidation is whole-game: a moderation action drops every entry for the
//! affected game and the next request refetches, rather than patching the
//! cached set in place.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{RecordType, Submission};

type CacheKey = (String, RecordType);

/// Read-through cache of normalized submissions.
#[derive(Default)]
pub struct SubmissionCache {
    entries: RwLock<HashMap<CacheKey, Arc<Vec<Submission>>>>,
}

impl SubmissionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, game: &str, record_type: RecordType) -> Option<Arc<Vec<Submission>>> {
        self.entries
            .read()
            .await
            .get(&(game.to_string(), record_type))
            .cloned()
    }

    pub async fn insert(
        &self,
        game: &str,
        record_type: RecordType,
        submissions: Arc<Vec<Submission>>,
    ) {
        self.entries
            .write()
            .await
            .insert((game.to_string(), record_type), submissions);
    }

    /// Drop every cached entry for a game.
    pub async fn invalidate_game(&self, game: &str) {
        self.entries
            .write()
            .await
            .retain(|(cached_game, _), _| cached_game != game);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_set() -> Arc<Vec<Submission>> {
        Arc::new(Vec::new())
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = SubmissionCache::new();
        assert!(cache.get("smb2", RecordType::Time).await.is_none());

        cache.insert("smb2", RecordType::Time, empty_set()).await;
        assert!(cache.get("smb2", RecordType::Time).await.is_some());
        // Other record type is still a miss.
        assert!(cache.get("smb2", RecordType::Score).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_drops_whole_game() {
        let cache = SubmissionCache::new();
        cache.insert("smb2", RecordType::Time, empty_set()).await;
        cache.insert("smb2", RecordType::Score, empty_set()).await;
        cache.insert("smb1", RecordType::Time, empty_set()).await;

        cache.invalidate_game("smb2").await;

        assert!(cache.get("smb2", RecordType::Time).await.is_none());
        assert!(cache.get("smb2", RecordType::Score).await.is_none());
        assert!(cache.get("smb1", RecordType::Time).await.is_some());
    }
}
