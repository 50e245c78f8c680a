//! Derived board models.
//!
//! These are the outputs of the ranking engine: positioned world-record
//! entries, medal rows, and totalizer rows. All of them are recomputed from
//! the submission set on demand and never persisted.

use serde::{Deserialize, Serialize};

use super::{Profile, Submission};

/// A positioned entry on a world-record board.
///
/// `position` is a competition rank: tied records share a position and the
/// sequence skips the numbers the tie consumed (1, 1, 3 rather than 1, 1, 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub position: u32,
    pub submission: Submission,
}

/// Previous/next level names for board navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjacent {
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// World-record board for a single level and record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecordBoard {
    /// Current records regardless of verification medium.
    pub all: Vec<RankedEntry>,
    /// Current records among live-verified submissions only.
    pub live: Vec<RankedEntry>,
    pub adjacent: Adjacent,
}

/// Medal counts for one user across a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCounts {
    pub platinum: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCounts {
    /// The counts as a lexicographically comparable tuple, best tier first.
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.platinum, self.gold, self.silver, self.bronze)
    }

    pub fn total(&self) -> u32 {
        self.platinum + self.gold + self.silver + self.bronze
    }
}

/// One row of a medal table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedalRow {
    pub profile: Profile,
    #[serde(flatten)]
    pub counts: MedalCounts,
    pub position: u32,
}

/// One row of a totalizer board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalRow {
    pub profile: Profile,
    /// Sum of the user's current records across the counted levels. Time
    /// totals are seconds with centisecond precision.
    pub total: f64,
    /// How many levels contributed to the total.
    pub levels_counted: u32,
    pub position: u32,
}

/// Totalizer board for a category and record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalizerBoard {
    /// Totals over every current record.
    pub all: Vec<TotalRow>,
    /// Totals over current records that are live-verified; a level whose
    /// current record is not live contributes nothing here.
    pub live: Vec<TotalRow>,
    /// Sum of the category's known par times, for display framing.
    pub par_total: f64,
}

/// Display components of a time total.
///
/// Totals stay numeric (seconds) inside the engine; this split happens only
/// at the output edge and is never parsed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub centis: u32,
}

impl TimeParts {
    pub fn from_seconds(total: f64) -> Self {
        let total_centis = (total * 100.0).round().max(0.0) as u64;
        let centis = (total_centis % 100) as u32;
        let total_seconds = total_centis / 100;
        Self {
            hours: (total_seconds / 3600) as u32,
            minutes: ((total_seconds % 3600) / 60) as u32,
            seconds: (total_seconds % 60) as u32,
            centis,
        }
    }
}

impl std::fmt::Display for TimeParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medal_counts_tuple_order() {
        let a = MedalCounts {
            platinum: 2,
            gold: 0,
            silver: 0,
            bronze: 0,
        };
        let b = MedalCounts {
            platinum: 1,
            gold: 9,
            silver: 9,
            bronze: 9,
        };
        // One extra platinum beats any number of lesser medals.
        assert!(a.as_tuple() > b.as_tuple());
        assert_eq!(a.total(), 2);
        assert_eq!(b.total(), 28);
    }

    #[test]
    fn test_time_parts_split() {
        let parts = TimeParts::from_seconds(3723.45);
        assert_eq!(parts.hours, 1);
        assert_eq!(parts.minutes, 2);
        assert_eq!(parts.seconds, 3);
        assert_eq!(parts.centis, 45);
        assert_eq!(parts.to_string(), "1:02:03.45");
    }

    #[test]
    fn test_time_parts_sub_minute() {
        let parts = TimeParts::from_seconds(12.5);
        assert_eq!(parts.hours, 0);
        assert_eq!(parts.minutes, 0);
        assert_eq!(parts.seconds, 12);
        assert_eq!(parts.centis, 50);
        assert_eq!(parts.to_string(), "0:00:12.50");
    }

    #[test]
    fn test_time_parts_rounding() {
        // 59.999 rounds up to the next whole minute at centi precision
        let parts = TimeParts::from_seconds(59.999);
        assert_eq!(parts.minutes, 1);
        assert_eq!(parts.seconds, 0);
        assert_eq!(parts.centis, 0);
    }

    #[test]
    fn test_medal_row_serializes_flat() {
        let row = MedalRow {
            profile: Profile::new("p-1".into(), "alice".to_string()),
            counts: MedalCounts {
                platinum: 1,
                gold: 2,
                silver: 0,
                bronze: 3,
            },
            position: 1,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["platinum"], 1);
        assert_eq!(json["bronze"], 3);
        assert_eq!(json["position"], 1);
    }
}
