//! Filesystem store.
//!
//! Each game keeps its reference data and submission tables as JSONL files
//! under `data/games/<game>/`. Score and time submissions stay in separate
//! files, matching the two-table shape they arrive in; unification into one
//! sequence happens in the normalizer, not at rest.

mod jsonl;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown game: {0}")]
    UnknownGame(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn games_dir(&self) -> PathBuf {
        self.data_dir.join("games")
    }

    pub fn game_dir(&self, game: &str) -> PathBuf {
        self.games_dir().join(game)
    }

    /// List the games present in the store, sorted by id.
    pub fn list_games(&self) -> Result<Vec<String>, StorageError> {
        let mut games = Vec::new();
        let dir = self.games_dir();
        if !dir.exists() {
            return Ok(games);
        }
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    games.push(name.to_string());
                }
            }
        }
        games.sort();
        Ok(games)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
