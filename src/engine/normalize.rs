//! Submission normalization.
//!
//! Merges the raw score and time tables into one sequence of [`Submission`]s
//! with resolved profile/level references and a single tagged record value.
//! Rows that fail integrity checks are dropped and reported, never fatal:
//! one bad row must not take down the whole board.

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::models::{
    Level, LevelId, Profile, ProfileId, RawSubmission, RecordType, Submission, SubmissionId,
};

/// Why a raw row was excluded from the normalized set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DropReason {
    #[error("references unknown level {0}")]
    UnknownLevel(LevelId),

    #[error("references unknown profile {0}")]
    UnknownProfile(ProfileId),

    #[error("missing {0} value")]
    MissingRecord(RecordType),

    #[error("non-finite {0} value")]
    BadRecord(RecordType),

    #[error("level {level} has no {record_type} chart")]
    ChartMismatch {
        level: String,
        record_type: RecordType,
    },
}

/// A raw row excluded during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    pub id: SubmissionId,
    pub reason: DropReason,
}

/// Output of a normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    /// Normalized submissions, ordered by submission time.
    pub submissions: Vec<Submission>,
    /// Rows excluded for integrity reasons.
    pub dropped: Vec<DroppedRow>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Merge raw score and time rows into normalized submissions.
///
/// Time values are rounded to centiseconds. The output is ordered by
/// `submitted_at` (ties by id, for a stable order).
pub fn normalize(
    score_rows: &[RawSubmission],
    time_rows: &[RawSubmission],
    profiles: &[Profile],
    levels: &[Level],
) -> NormalizeReport {
    let profile_index: HashMap<&str, &Profile> =
        profiles.iter().map(|p| (p.id.as_str(), p)).collect();
    let level_index: HashMap<&str, &Level> = levels.iter().map(|l| (l.id.as_str(), l)).collect();

    let mut report = NormalizeReport::default();

    let batches = [
        (score_rows, RecordType::Score),
        (time_rows, RecordType::Time),
    ];
    for (rows, record_type) in batches {
        for row in rows {
            match convert(row, record_type, &profile_index, &level_index) {
                Ok(submission) => report.submissions.push(submission),
                Err(reason) => {
                    warn!(id = %row.id, %reason, "dropping submission");
                    report.dropped.push(DroppedRow {
                        id: row.id.clone(),
                        reason,
                    });
                }
            }
        }
    }

    report
        .submissions
        .sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at).then_with(|| a.id.as_str().cmp(b.id.as_str())));

    report
}

fn convert(
    row: &RawSubmission,
    record_type: RecordType,
    profiles: &HashMap<&str, &Profile>,
    levels: &HashMap<&str, &Level>,
) -> Result<Submission, DropReason> {
    let level = levels
        .get(row.level_id.as_str())
        .ok_or_else(|| DropReason::UnknownLevel(row.level_id.clone()))?;
    let profile = profiles
        .get(row.profile_id.as_str())
        .ok_or_else(|| DropReason::UnknownProfile(row.profile_id.clone()))?;

    let value = match record_type {
        RecordType::Score => row.score,
        RecordType::Time => row.time,
    };
    let value = value.ok_or(DropReason::MissingRecord(record_type))?;
    if !value.is_finite() {
        return Err(DropReason::BadRecord(record_type));
    }

    if !level.chart.allows(record_type) {
        return Err(DropReason::ChartMismatch {
            level: level.name.clone(),
            record_type,
        });
    }

    let record = match record_type {
        RecordType::Score => value,
        RecordType::Time => round_centi(value),
    };

    Ok(Submission {
        id: row.id.clone(),
        profile: (*profile).clone(),
        level: (*level).clone(),
        record,
        record_type,
        submitted_at: row.submitted_at,
        live: row.live,
        approved: row.approved,
        monkey: row.monkey.clone(),
        platform: row.platform.clone(),
        region: row.region.clone(),
        tas: row.tas,
    })
}

/// Round to two decimal places (centisecond precision for times).
pub fn round_centi(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChartKind;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, secs).unwrap()
    }

    fn fixtures() -> (Vec<Profile>, Vec<Level>) {
        let profiles = vec![
            Profile::new("p-a".into(), "alice".to_string()),
            Profile::new("p-b".into(), "bob".to_string()),
        ];
        let levels = vec![
            Level::new("l-1".into(), "Floor 1".to_string()),
            Level::new("l-2".into(), "Floor 2".to_string()).with_chart(ChartKind::Time),
        ];
        (profiles, levels)
    }

    #[test]
    fn test_merges_both_tables_in_time_order() {
        let (profiles, levels) = fixtures();
        let scores = vec![RawSubmission::score_row("p-a".into(), "l-1".into(), 500.0, ts(10))];
        let times = vec![RawSubmission::time_row("p-b".into(), "l-1".into(), 42.0, ts(5))];

        let report = normalize(&scores, &times, &profiles, &levels);

        assert!(report.is_clean());
        assert_eq!(report.submissions.len(), 2);
        assert_eq!(report.submissions[0].profile.username, "bob");
        assert_eq!(report.submissions[0].record_type, RecordType::Time);
        assert_eq!(report.submissions[1].profile.username, "alice");
        assert_eq!(report.submissions[1].record_type, RecordType::Score);
    }

    #[test]
    fn test_time_values_rounded_to_centis() {
        let (profiles, levels) = fixtures();
        let times = vec![RawSubmission::time_row("p-a".into(), "l-2".into(), 12.3456, ts(0))];

        let report = normalize(&[], &times, &profiles, &levels);

        assert_eq!(report.submissions[0].record, 12.35);
    }

    #[test]
    fn test_scores_not_rounded() {
        let (profiles, levels) = fixtures();
        let scores = vec![RawSubmission::score_row("p-a".into(), "l-1".into(), 1234.0, ts(0))];

        let report = normalize(&scores, &[], &profiles, &levels);

        assert_eq!(report.submissions[0].record, 1234.0);
    }

    #[test]
    fn test_unknown_level_dropped_not_fatal() {
        let (profiles, levels) = fixtures();
        let scores = vec![
            RawSubmission::score_row("p-a".into(), "l-404".into(), 500.0, ts(0)),
            RawSubmission::score_row("p-a".into(), "l-1".into(), 400.0, ts(1)),
        ];

        let report = normalize(&scores, &[], &profiles, &levels);

        assert_eq!(report.submissions.len(), 1);
        assert_eq!(report.dropped.len(), 1);
        assert!(matches!(report.dropped[0].reason, DropReason::UnknownLevel(_)));
    }

    #[test]
    fn test_unknown_profile_dropped() {
        let (profiles, levels) = fixtures();
        let times = vec![RawSubmission::time_row("p-ghost".into(), "l-1".into(), 10.0, ts(0))];

        let report = normalize(&[], &times, &profiles, &levels);

        assert!(report.submissions.is_empty());
        assert!(matches!(
            report.dropped[0].reason,
            DropReason::UnknownProfile(_)
        ));
    }

    #[test]
    fn test_missing_and_non_finite_records_dropped() {
        let (profiles, levels) = fixtures();
        let mut missing = RawSubmission::score_row("p-a".into(), "l-1".into(), 0.0, ts(0));
        missing.score = None;
        let mut bad = RawSubmission::score_row("p-a".into(), "l-1".into(), 0.0, ts(1));
        bad.score = Some(f64::NAN);

        let report = normalize(&[missing, bad], &[], &profiles, &levels);

        assert!(report.submissions.is_empty());
        assert_eq!(report.dropped.len(), 2);
        assert_eq!(
            report.dropped[0].reason,
            DropReason::MissingRecord(RecordType::Score)
        );
        assert_eq!(
            report.dropped[1].reason,
            DropReason::BadRecord(RecordType::Score)
        );
    }

    #[test]
    fn test_chart_restriction_excludes_disallowed_type() {
        let (profiles, levels) = fixtures();
        // l-2 is a time-only level; a score row for it must not appear.
        let scores = vec![RawSubmission::score_row("p-a".into(), "l-2".into(), 900.0, ts(0))];

        let report = normalize(&scores, &[], &profiles, &levels);

        assert!(report.submissions.is_empty());
        assert!(matches!(
            report.dropped[0].reason,
            DropReason::ChartMismatch { .. }
        ));
    }

    #[test]
    fn test_empty_input_is_clean() {
        let report = normalize(&[], &[], &[], &[]);
        assert!(report.is_clean());
        assert!(report.submissions.is_empty());
    }
}
