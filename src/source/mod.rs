//! Submission data sources.
//!
//! The engine doesn't care where submissions come from; this trait is the
//! seam. [`JsonlSource`] reads the local store and is the default.
//! [`HttpSource`] proxies a remote deployment of the same API, for running a
//! read-only mirror without a copy of the data.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::models::{CategoryConfig, Level, Profile, RawSubmission, RecordType};
use crate::storage::{EntityType, JsonlReader, StorageConfig, StorageError};

/// Errors from a submission source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid source URL: {0}")]
    InvalidUrl(String),
}

/// Read access to a game's reference data and submission tables.
///
/// Implementations return every stored row, approved or not, live or not;
/// all filtering is the engine's job.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn fetch_submissions(
        &self,
        game: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawSubmission>, SourceError>;

    async fn fetch_levels(&self, game: &str) -> Result<Vec<Level>, SourceError>;

    async fn fetch_categories(&self, game: &str) -> Result<Vec<CategoryConfig>, SourceError>;

    async fn fetch_profiles(&self, game: &str) -> Result<Vec<Profile>, SourceError>;
}

/// Source backed by the local JSONL store.
pub struct JsonlSource {
    storage: StorageConfig,
}

impl JsonlSource {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SubmissionSource for JsonlSource {
    async fn fetch_submissions(
        &self,
        game: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawSubmission>, SourceError> {
        let entity = match record_type {
            RecordType::Score => EntityType::ScoreSubmission,
            RecordType::Time => EntityType::TimeSubmission,
        };
        Ok(JsonlReader::for_game(&self.storage, entity, game).read_all()?)
    }

    async fn fetch_levels(&self, game: &str) -> Result<Vec<Level>, SourceError> {
        Ok(JsonlReader::for_game(&self.storage, EntityType::Level, game).read_all()?)
    }

    async fn fetch_categories(&self, game: &str) -> Result<Vec<CategoryConfig>, SourceError> {
        Ok(JsonlReader::for_game(&self.storage, EntityType::Category, game).read_all()?)
    }

    async fn fetch_profiles(&self, game: &str) -> Result<Vec<Profile>, SourceError> {
        Ok(JsonlReader::for_game(&self.storage, EntityType::Profile, game).read_all()?)
    }
}

/// Source backed by a remote rankboard-compatible API.
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a source against `base_url`, which must end with a trailing
    /// slash (e.g. `https://boards.example/api/`).
    pub fn new(base_url: Url, timeout: std::time::Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|e| SourceError::InvalidUrl(format!("{path}: {e}")))
    }
}

#[async_trait]
impl SubmissionSource for HttpSource {
    async fn fetch_submissions(
        &self,
        game: &str,
        record_type: RecordType,
    ) -> Result<Vec<RawSubmission>, SourceError> {
        let url = self.endpoint(&format!("games/{game}/raw-submissions"))?;
        let rows = self
            .client
            .get(url)
            .query(&[("type", record_type.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn fetch_levels(&self, game: &str) -> Result<Vec<Level>, SourceError> {
        let url = self.endpoint(&format!("games/{game}/levels"))?;
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn fetch_categories(&self, game: &str) -> Result<Vec<CategoryConfig>, SourceError> {
        let url = self.endpoint(&format!("games/{game}/categories"))?;
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    async fn fetch_profiles(&self, game: &str) -> Result<Vec<Profile>, SourceError> {
        let url = self.endpoint(&format!("games/{game}/profiles"))?;
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::JsonlWriter;
    use chrono::{TimeZone, Utc};

    fn seeded_source() -> (tempfile::TempDir, JsonlSource) {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageConfig::new(tmp.path().to_path_buf());

        JsonlWriter::for_game(&storage, EntityType::Profile, "smb2")
            .write_all(&[Profile::new("p-1".into(), "alice".to_string())])
            .unwrap();
        JsonlWriter::for_game(&storage, EntityType::Level, "smb2")
            .write_all(&[Level::new("l-1".into(), "Floor 1".to_string())])
            .unwrap();
        JsonlWriter::for_game(&storage, EntityType::TimeSubmission, "smb2")
            .write_all(&[RawSubmission::time_row(
                "p-1".into(),
                "l-1".into(),
                12.34,
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            )])
            .unwrap();

        (tmp, JsonlSource::new(storage))
    }

    #[tokio::test]
    async fn test_jsonl_source_reads_tables() {
        let (_tmp, source) = seeded_source();

        let profiles = source.fetch_profiles("smb2").await.unwrap();
        assert_eq!(profiles.len(), 1);

        let levels = source.fetch_levels("smb2").await.unwrap();
        assert_eq!(levels[0].name, "Floor 1");

        let times = source
            .fetch_submissions("smb2", RecordType::Time)
            .await
            .unwrap();
        assert_eq!(times.len(), 1);
        assert_eq!(times[0].time, Some(12.34));

        // The score table was never written; it reads as empty.
        let scores = source
            .fetch_submissions("smb2", RecordType::Score)
            .await
            .unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_jsonl_source_unknown_game_is_empty() {
        let (_tmp, source) = seeded_source();
        let rows = source
            .fetch_submissions("unknown", RecordType::Time)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_http_source_endpoint_join() {
        let source = HttpSource::new(
            Url::parse("https://boards.example/api/").unwrap(),
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        let url = source.endpoint("games/smb2/levels").unwrap();
        assert_eq!(url.as_str(), "https://boards.example/api/games/smb2/levels");
    }
}
