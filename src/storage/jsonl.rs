//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for all stored data. Each line is one JSON
//! object; unparseable lines are skipped with a warning so one corrupt row
//! never takes a whole table offline.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Entity tables stored per game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Profile,
    Level,
    Category,
    ScoreSubmission,
    TimeSubmission,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Profile => "profiles.jsonl",
            EntityType::Level => "levels.jsonl",
            EntityType::Category => "categories.jsonl",
            EntityType::ScoreSubmission => "score_submissions.jsonl",
            EntityType::TimeSubmission => "time_submissions.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for an entity table of a game.
    pub fn for_game(config: &StorageConfig, entity: EntityType, game: &str) -> Self {
        Self::new(config.game_dir(game).join(entity.filename()))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(entity)?)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            writeln!(writer, "{}", serde_json::to_string(entity)?)?;
            count += 1;
        }

        writer.flush()?;
        debug!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for an entity table of a game.
    pub fn for_game(config: &StorageConfig, entity: EntityType, game: &str) -> Self {
        Self::new(config.game_dir(game).join(entity.filename()))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities. A missing file reads as empty; malformed lines are
    /// skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        line_num + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Profile;

    fn test_config() -> (tempfile::TempDir, StorageConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());
        (tmp, config)
    }

    #[test]
    fn test_entity_filenames() {
        assert_eq!(EntityType::Profile.filename(), "profiles.jsonl");
        assert_eq!(
            EntityType::ScoreSubmission.filename(),
            "score_submissions.jsonl"
        );
        assert_eq!(
            EntityType::TimeSubmission.filename(),
            "time_submissions.jsonl"
        );
    }

    #[test]
    fn test_append_then_read() {
        let (_tmp, config) = test_config();
        let writer = JsonlWriter::<Profile>::for_game(&config, EntityType::Profile, "smb2");
        writer
            .append(&Profile::new("p-1".into(), "alice".to_string()))
            .unwrap();
        writer
            .append(&Profile::new("p-2".into(), "bob".to_string()))
            .unwrap();

        let reader = JsonlReader::<Profile>::for_game(&config, EntityType::Profile, "smb2");
        let profiles = reader.read_all().unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].username, "bob");
    }

    #[test]
    fn test_write_all_replaces() {
        let (_tmp, config) = test_config();
        let writer = JsonlWriter::<Profile>::for_game(&config, EntityType::Profile, "smb2");
        writer
            .write_all(&[Profile::new("p-1".into(), "alice".to_string())])
            .unwrap();
        writer
            .write_all(&[Profile::new("p-2".into(), "bob".to_string())])
            .unwrap();

        let reader = JsonlReader::<Profile>::for_game(&config, EntityType::Profile, "smb2");
        let profiles = reader.read_all().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].username, "bob");
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_tmp, config) = test_config();
        let reader = JsonlReader::<Profile>::for_game(&config, EntityType::Profile, "nope");
        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_line_skipped() {
        let (_tmp, config) = test_config();
        let path = config.game_dir("smb2").join("profiles.jsonl");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "{\"id\":\"p-1\",\"username\":\"alice\",\"country\":null,\"avatar\":null}\nnot json\n",
        )
        .unwrap();

        let reader = JsonlReader::<Profile>::for_game(&config, EntityType::Profile, "smb2");
        let profiles = reader.read_all().unwrap();
        assert_eq!(profiles.len(), 1);
    }
}
