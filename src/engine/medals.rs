//! Medal table aggregation.
//!
//! Medals are awarded from each level's live-only board: positions 1 through
//! 4 map to platinum, gold, silver, and bronze. Competition ranking carries
//! through, so a tie at position 1 hands every tied runner a platinum and the
//! positions the tie consumed award nothing for that level.

use std::collections::HashMap;

use crate::models::{
    Direction, Level, MedalCounts, MedalRow, Profile, ProfileId, RankedEntry, Submission,
};

use super::position::assign_positions;
use super::records::ranked_board;

/// Aggregate per-level live boards into a positioned medal table.
///
/// `participants` seeds a zero-medal row for every profile that should appear
/// even without a top-4 finish (anyone with a live run in the category).
pub fn medal_table(boards: &[Vec<RankedEntry>], participants: &[Profile]) -> Vec<MedalRow> {
    let mut rows: HashMap<ProfileId, (Profile, MedalCounts)> = participants
        .iter()
        .map(|p| (p.id.clone(), (p.clone(), MedalCounts::default())))
        .collect();

    for board in boards {
        for entry in board.iter().filter(|e| e.position <= 4) {
            let profile = &entry.submission.profile;
            let (_, counts) = rows
                .entry(profile.id.clone())
                .or_insert_with(|| (profile.clone(), MedalCounts::default()));
            match entry.position {
                1 => counts.platinum += 1,
                2 => counts.gold += 1,
                3 => counts.silver += 1,
                4 => counts.bronze += 1,
                _ => {}
            }
        }
    }

    let mut table: Vec<(Profile, MedalCounts)> = rows.into_values().collect();
    table.sort_by(|(pa, ca), (pb, cb)| {
        cb.as_tuple()
            .cmp(&ca.as_tuple())
            .then_with(|| pa.username.to_lowercase().cmp(&pb.username.to_lowercase()))
    });

    let positions = assign_positions(&table, |(_, counts)| counts.as_tuple());
    table
        .into_iter()
        .zip(positions)
        .map(|((profile, counts), position)| MedalRow {
            profile,
            counts,
            position,
        })
        .collect()
}

/// Build the medal table for a whole category from its normalized submission
/// set: per-level live boards truncated to the top four positions, seeded
/// with everyone who has an approved live run.
pub fn medal_table_for_category(
    submissions: &[Submission],
    levels: &[Level],
    direction: Direction,
) -> Vec<MedalRow> {
    let boards: Vec<Vec<RankedEntry>> = levels
        .iter()
        .map(|level| {
            ranked_board(
                submissions
                    .iter()
                    .filter(|s| s.level.id == level.id && s.live),
                direction,
            )
            .into_iter()
            .filter(|e| e.position <= 4)
            .collect()
        })
        .collect();

    let participants = live_participants(submissions);
    medal_table(&boards, &participants)
}

/// Profiles with at least one approved live submission, deduplicated.
pub fn live_participants(submissions: &[Submission]) -> Vec<Profile> {
    let mut seen: HashMap<ProfileId, Profile> = HashMap::new();
    for submission in submissions.iter().filter(|s| s.live && s.approved) {
        seen.entry(submission.profile.id.clone())
            .or_insert_with(|| submission.profile.clone());
    }
    seen.into_values().collect()
}
