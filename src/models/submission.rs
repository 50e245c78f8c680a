//! Submission models.
//!
//! Submissions arrive in two shapes. [`RawSubmission`] is the at-rest/wire
//! row: score and time submissions live in separate tables with separate
//! value columns, mirroring the upstream store. [`Submission`] is the
//! normalized form the ranking engine consumes, with a single numeric record
//! tagged by [`RecordType`] and the profile/level references resolved.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, Level, LevelId, Profile, ProfileId, SubmissionId};

/// Whether a record value is a score or a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Score,
    Time,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Score => "score",
            RecordType::Time => "time",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(RecordType::Score),
            "time" => Ok(RecordType::Time),
            other => Err(format!("unknown record type: {other}")),
        }
    }
}

/// A submission row as stored and transported.
///
/// Exactly one of `score`/`time` is set depending on which table the row
/// comes from; the normalizer rejects rows where the expected value is
/// missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSubmission {
    pub id: SubmissionId,

    pub profile_id: ProfileId,

    pub level_id: LevelId,

    #[serde(default)]
    pub score: Option<f64>,

    #[serde(default)]
    pub time: Option<f64>,

    pub submitted_at: DateTime<Utc>,

    /// Backed by a live video recording rather than a replay file.
    #[serde(default)]
    pub live: bool,

    /// Confirmed valid by a moderator.
    #[serde(default)]
    pub approved: bool,

    /// Descriptive filter tags; never affect ranking.
    #[serde(default)]
    pub monkey: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tas: bool,
}

impl RawSubmission {
    /// Create a score-table row.
    pub fn score_row(
        profile_id: ProfileId,
        level_id: LevelId,
        score: f64,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let id = EntityId::derive(&[
            "score",
            profile_id.as_str(),
            level_id.as_str(),
            &submitted_at.to_rfc3339(),
        ]);
        Self {
            id,
            profile_id,
            level_id,
            score: Some(score),
            time: None,
            submitted_at,
            live: false,
            approved: false,
            monkey: None,
            platform: None,
            region: None,
            tas: false,
        }
    }

    /// Create a time-table row.
    pub fn time_row(
        profile_id: ProfileId,
        level_id: LevelId,
        time: f64,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let id = EntityId::derive(&[
            "time",
            profile_id.as_str(),
            level_id.as_str(),
            &submitted_at.to_rfc3339(),
        ]);
        Self {
            id,
            profile_id,
            level_id,
            score: None,
            time: Some(time),
            submitted_at,
            live: false,
            approved: false,
            monkey: None,
            platform: None,
            region: None,
            tas: false,
        }
    }

    /// Builder method to mark the row live-verified.
    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Builder method to mark the row moderator-approved.
    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    /// Builder method to attach filter tags.
    pub fn with_tags(
        mut self,
        monkey: Option<String>,
        platform: Option<String>,
        region: Option<String>,
        tas: bool,
    ) -> Self {
        self.monkey = monkey;
        self.platform = platform;
        self.region = region;
        self.tas = tas;
        self
    }
}

/// A normalized submission, ready for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,

    pub profile: Profile,

    pub level: Level,

    /// The record value. Times are in seconds rounded to centiseconds.
    pub record: f64,

    pub record_type: RecordType,

    pub submitted_at: DateTime<Utc>,

    pub live: bool,

    pub approved: bool,

    pub monkey: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
    pub tas: bool,
}
