//! Level model.

use serde::{Deserialize, Serialize};

use super::{LevelId, RecordType};

/// Which record types a level accepts submissions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Score chart only.
    Score,
    /// Time chart only.
    Time,
    /// Both score and time charts.
    Both,
}

impl ChartKind {
    /// Whether this chart accepts the given record type.
    pub fn allows(&self, record_type: RecordType) -> bool {
        match self {
            ChartKind::Score => record_type == RecordType::Score,
            ChartKind::Time => record_type == RecordType::Time,
            ChartKind::Both => true,
        }
    }
}

/// A single level (stage) within a game.
///
/// Level order within a game is the order of the stored level list; boards use
/// it for previous/next navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: LevelId,

    pub name: String,

    /// Whether the level belongs to the miscellaneous/alternate category
    /// rather than the main one.
    #[serde(default)]
    pub misc: bool,

    /// Record types this level has charts for.
    #[serde(default = "default_chart")]
    pub chart: ChartKind,

    /// Theoretical maximum/par time in seconds, used for totalizer framing.
    pub par_time: Option<f64>,
}

fn default_chart() -> ChartKind {
    ChartKind::Both
}

impl Level {
    pub fn new(id: LevelId, name: String) -> Self {
        Self {
            id,
            name,
            misc: false,
            chart: default_chart(),
            par_time: None,
        }
    }

    /// Builder method to mark the level as miscellaneous.
    pub fn with_misc(mut self, misc: bool) -> Self {
        self.misc = misc;
        self
    }

    /// Builder method to restrict the chart kind.
    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    /// Builder method to set the par time.
    pub fn with_par_time(mut self, par_time: f64) -> Self {
        self.par_time = Some(par_time);
        self
    }
}
