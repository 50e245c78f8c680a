//! Category configuration and ranking direction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{CategoryId, RecordType};

/// Which way a record value ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Lower values are better (typical for times).
    Ascending,
    /// Higher values are better (typical for scores).
    Descending,
}

impl Direction {
    /// Order two record values best-first.
    ///
    /// Returns `Less` when `a` ranks strictly better than `b`, so a slice
    /// sorted with this comparator runs best to worst.
    pub fn cmp_values(self, a: f64, b: f64) -> Ordering {
        match self {
            Direction::Ascending => a.total_cmp(&b),
            Direction::Descending => b.total_cmp(&a),
        }
    }
}

/// Per-category ranking configuration.
///
/// A game splits its levels into a main and a miscellaneous category; each
/// category decides the ranking direction per record type and whether the
/// aggregate boards (medals, totalizer) exist for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub id: CategoryId,

    pub name: String,

    /// Lower scores rank better when set. Scores conventionally rank
    /// descending, so this defaults to false.
    #[serde(default)]
    pub ascending_score: bool,

    /// Lower times rank better when set. Times conventionally rank
    /// ascending, so this defaults to true.
    #[serde(default = "default_true")]
    pub ascending_time: bool,

    /// Practice-style categories get medal tables and totalizers in addition
    /// to world records; others get world records only.
    #[serde(default)]
    pub practice_style: bool,

    /// Whether this category covers the miscellaneous level set.
    #[serde(default)]
    pub misc: bool,
}

fn default_true() -> bool {
    true
}

impl CategoryConfig {
    pub fn new(id: CategoryId, name: String) -> Self {
        Self {
            id,
            name,
            ascending_score: false,
            ascending_time: true,
            practice_style: false,
            misc: false,
        }
    }

    /// Builder method to flip a record type to ascending ranking.
    pub fn with_ascending(mut self, record_type: RecordType, ascending: bool) -> Self {
        match record_type {
            RecordType::Score => self.ascending_score = ascending,
            RecordType::Time => self.ascending_time = ascending,
        }
        self
    }

    /// Builder method to mark the category practice-style.
    pub fn with_practice_style(mut self, practice_style: bool) -> Self {
        self.practice_style = practice_style;
        self
    }

    /// Builder method to bind the category to the miscellaneous level set.
    pub fn with_misc(mut self, misc: bool) -> Self {
        self.misc = misc;
        self
    }

    /// Resolve the ranking direction for a record type.
    pub fn direction(&self, record_type: RecordType) -> Direction {
        let ascending = match record_type {
            RecordType::Score => self.ascending_score,
            RecordType::Time => self.ascending_time,
        };
        if ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }
}
