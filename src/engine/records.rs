//! World-record board construction.
//!
//! The obsolescence rule lives here and is shared with the totalizer: for
//! each (profile, level) pair, the single current record is the best-ranked
//! approved submission, ties broken by earliest submission time. Everything
//! older by the same user for the same level and record type is obsolete and
//! hidden from default views.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{Adjacent, Direction, Level, LevelId, RankedEntry, Submission, WorldRecordBoard};

use super::position::assign_positions;

/// Reduce submissions to each profile's current record per level.
///
/// Ties on the record value keep the earliest-submitted run. The output order
/// is unspecified; callers sort.
pub fn current_records<'a, I>(submissions: I, direction: Direction) -> Vec<&'a Submission>
where
    I: IntoIterator<Item = &'a Submission>,
{
    let mut best: HashMap<(&str, &str), &Submission> = HashMap::new();

    for submission in submissions {
        let key = (
            submission.profile.id.as_str(),
            submission.level.id.as_str(),
        );
        match best.get(&key) {
            Some(incumbent) => {
                let ordering = direction
                    .cmp_values(submission.record, incumbent.record)
                    .then_with(|| submission.submitted_at.cmp(&incumbent.submitted_at));
                if ordering == Ordering::Less {
                    best.insert(key, submission);
                }
            }
            None => {
                best.insert(key, submission);
            }
        }
    }

    best.into_values().collect()
}

/// Build a positioned board from submissions: approved only, obsolete runs
/// removed, sorted best-first with earlier submissions winning ties.
pub fn ranked_board<'a, I>(submissions: I, direction: Direction) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = &'a Submission>,
{
    let approved = submissions.into_iter().filter(|s| s.approved);
    let mut current = current_records(approved, direction);
    current.sort_by(|a, b| {
        direction
            .cmp_values(a.record, b.record)
            .then_with(|| a.submitted_at.cmp(&b.submitted_at))
    });

    let positions = assign_positions(&current, |s| s.record.to_bits());
    current
        .into_iter()
        .zip(positions)
        .map(|(submission, position)| RankedEntry {
            position,
            submission: submission.clone(),
        })
        .collect()
}

/// Build the world-record board for one level: the full board, the live-only
/// variant, and the navigation links.
pub fn world_record_board(
    submissions: &[Submission],
    direction: Direction,
    adjacent: Adjacent,
) -> WorldRecordBoard {
    let all = ranked_board(submissions.iter(), direction);
    let live = ranked_board(submissions.iter().filter(|s| s.live), direction);
    WorldRecordBoard {
        all,
        live,
        adjacent,
    }
}

/// The "show obsolete" view: every approved submission for the level in
/// submission-time order, no filtering and no positions.
pub fn submission_history(submissions: &[Submission]) -> Vec<Submission> {
    let mut history: Vec<Submission> = submissions.iter().filter(|s| s.approved).cloned().collect();
    history.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
    history
}

/// Previous/next level names around `current` in an ordered level list.
pub fn adjacent_levels(levels: &[Level], current: &LevelId) -> Adjacent {
    let Some(index) = levels.iter().position(|l| &l.id == current) else {
        return Adjacent::default();
    };
    Adjacent {
        prev: (index > 0).then(|| levels[index - 1].name.clone()),
        next: levels.get(index + 1).map(|l| l.name.clone()),
    }
}
