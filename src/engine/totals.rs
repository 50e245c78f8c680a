//! Totalizer aggregation.
//!
//! Sums each user's current record across every level of a category. The
//! live variant reuses the same current-record resolution: a level whose
//! current record lacks live video contributes nothing to the live total,
//! rather than falling back to an older live run.
//!
//! Totals accumulate in integer centi-units so equal totals compare exactly
//! regardless of summation order.

use std::collections::{HashMap, HashSet};

use crate::models::{Direction, Level, Profile, ProfileId, Submission, TotalRow, TotalizerBoard};

use super::position::assign_positions;
use super::records::current_records;

#[derive(Default)]
struct Accumulator {
    total_centis: i64,
    levels_counted: u32,
}

/// Build the totalizer board for a category and record type.
///
/// `submissions` is the category's normalized submission set for one record
/// type; `levels` is the category's level list, consulted for membership and
/// par times.
pub fn totalizer_board(
    submissions: &[Submission],
    levels: &[Level],
    direction: Direction,
) -> TotalizerBoard {
    let level_ids: HashSet<&str> = levels.iter().map(|l| l.id.as_str()).collect();

    let approved = submissions.iter().filter(|s| s.approved);
    let current = current_records(approved, direction);

    let mut profiles: HashMap<ProfileId, Profile> = HashMap::new();
    let mut all: HashMap<ProfileId, Accumulator> = HashMap::new();
    let mut live: HashMap<ProfileId, Accumulator> = HashMap::new();

    for submission in current {
        if !level_ids.contains(submission.level.id.as_str()) {
            continue;
        }
        let id = submission.profile.id.clone();
        profiles
            .entry(id.clone())
            .or_insert_with(|| submission.profile.clone());

        let centis = to_centis(submission.record);
        let entry = all.entry(id.clone()).or_default();
        entry.total_centis += centis;
        entry.levels_counted += 1;

        if submission.live {
            let entry = live.entry(id).or_default();
            entry.total_centis += centis;
            entry.levels_counted += 1;
        }
    }

    let par_total = levels.iter().filter_map(|l| l.par_time).sum();

    TotalizerBoard {
        all: rank_totals(all, &profiles, direction),
        live: rank_totals(live, &profiles, direction),
        par_total,
    }
}

fn rank_totals(
    totals: HashMap<ProfileId, Accumulator>,
    profiles: &HashMap<ProfileId, Profile>,
    direction: Direction,
) -> Vec<TotalRow> {
    let mut rows: Vec<(Profile, Accumulator)> = totals
        .into_iter()
        .filter_map(|(id, acc)| profiles.get(&id).cloned().map(|p| (p, acc)))
        .collect();

    rows.sort_by(|(pa, aa), (pb, ab)| {
        direction
            .cmp_values(aa.total_centis as f64, ab.total_centis as f64)
            .then_with(|| pa.username.to_lowercase().cmp(&pb.username.to_lowercase()))
    });

    let positions = assign_positions(&rows, |(_, acc)| acc.total_centis);
    rows.into_iter()
        .zip(positions)
        .map(|((profile, acc), position)| TotalRow {
            profile,
            total: acc.total_centis as f64 / 100.0,
            levels_counted: acc.levels_counted,
            position,
        })
        .collect()
}

fn to_centis(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordType;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, secs).unwrap()
    }

    fn time_sub(
        user: &str,
        level: &str,
        record: f64,
        at: DateTime<Utc>,
        live: bool,
    ) -> Submission {
        Submission {
            id: crate::models::EntityId::derive(&[user, level, &at.to_rfc3339()]),
            profile: Profile::new(user.into(), user.to_string()),
            level: Level::new(level.into(), format!("Level {level}")),
            record,
            record_type: RecordType::Time,
            submitted_at: at,
            live,
            approved: true,
            monkey: None,
            platform: None,
            region: None,
            tas: false,
        }
    }

    fn levels_with_par(specs: &[(&str, f64)]) -> Vec<Level> {
        specs
            .iter()
            .map(|(id, par)| {
                Level::new((*id).into(), format!("Level {id}")).with_par_time(*par)
            })
            .collect()
    }

    #[test]
    fn test_live_counts_only_live_current_records() {
        // A's current records: L1 = 12s (live), L2 = 25s (replay).
        let subs = vec![
            time_sub("a", "l1", 12.0, ts(1), true),
            time_sub("a", "l2", 25.0, ts(2), false),
        ];
        let levels = levels_with_par(&[("l1", 10.0), ("l2", 20.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all.len(), 1);
        assert_eq!(board.all[0].total, 37.0);
        assert_eq!(board.all[0].levels_counted, 2);

        // L2's current record is not live: it contributes nothing, with no
        // substitute penalty.
        assert_eq!(board.live.len(), 1);
        assert_eq!(board.live[0].total, 12.0);
        assert_eq!(board.live[0].levels_counted, 1);

        assert_eq!(board.par_total, 30.0);
    }

    #[test]
    fn test_live_never_falls_back_to_older_live_run() {
        // A has an old live 30s run on L1, later beaten by a 20s replay.
        // The current record is the replay, so the live total gets nothing.
        let subs = vec![
            time_sub("a", "l1", 30.0, ts(1), true),
            time_sub("a", "l1", 20.0, ts(2), false),
        ];
        let levels = levels_with_par(&[("l1", 10.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all[0].total, 20.0);
        assert!(board.live.is_empty());
    }

    #[test]
    fn test_live_levels_are_subset_of_all_levels() {
        let subs = vec![
            time_sub("a", "l1", 10.0, ts(1), true),
            time_sub("a", "l2", 11.0, ts(2), false),
            time_sub("a", "l3", 12.0, ts(3), true),
        ];
        let levels = levels_with_par(&[("l1", 5.0), ("l2", 5.0), ("l3", 5.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert!(board.live[0].levels_counted <= board.all[0].levels_counted);
        assert_eq!(board.live[0].levels_counted, 2);
        assert_eq!(board.live[0].total, 22.0);
    }

    #[test]
    fn test_obsolete_runs_do_not_inflate_totals() {
        let subs = vec![
            time_sub("a", "l1", 15.0, ts(1), true),
            time_sub("a", "l1", 12.0, ts(2), true),
        ];
        let levels = levels_with_par(&[("l1", 10.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all[0].total, 12.0);
        assert_eq!(board.all[0].levels_counted, 1);
    }

    #[test]
    fn test_time_totals_rank_ascending() {
        let subs = vec![
            time_sub("slow", "l1", 20.0, ts(1), true),
            time_sub("fast", "l1", 10.0, ts(2), true),
        ];
        let levels = levels_with_par(&[("l1", 5.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all[0].profile.username, "fast");
        assert_eq!(board.all[0].position, 1);
        assert_eq!(board.all[1].profile.username, "slow");
        assert_eq!(board.all[1].position, 2);
    }

    #[test]
    fn test_score_totals_rank_descending() {
        let mut subs = vec![
            time_sub("low", "l1", 100.0, ts(1), true),
            time_sub("high", "l1", 300.0, ts(2), true),
        ];
        for s in &mut subs {
            s.record_type = RecordType::Score;
        }
        let levels = levels_with_par(&[("l1", 0.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Descending);

        assert_eq!(board.all[0].profile.username, "high");
        assert_eq!(board.all[1].profile.username, "low");
    }

    #[test]
    fn test_equal_totals_share_position() {
        let subs = vec![
            time_sub("a", "l1", 10.5, ts(1), true),
            time_sub("a", "l2", 20.5, ts(2), true),
            time_sub("b", "l1", 15.5, ts(3), true),
            time_sub("b", "l2", 15.5, ts(4), true),
            time_sub("c", "l1", 40.0, ts(5), true),
        ];
        let levels = levels_with_par(&[("l1", 10.0), ("l2", 10.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all[0].total, 31.0);
        assert_eq!(board.all[1].total, 31.0);
        assert_eq!(board.all[0].position, 1);
        assert_eq!(board.all[1].position, 1);
        assert_eq!(board.all[2].position, 3);
    }

    #[test]
    fn test_levels_outside_category_ignored() {
        let subs = vec![
            time_sub("a", "l1", 10.0, ts(1), true),
            time_sub("a", "l-other", 99.0, ts(2), true),
        ];
        let levels = levels_with_par(&[("l1", 5.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all[0].total, 10.0);
        assert_eq!(board.all[0].levels_counted, 1);
    }

    #[test]
    fn test_unapproved_submissions_ignored() {
        let mut pending = time_sub("a", "l1", 5.0, ts(1), true);
        pending.approved = false;
        let subs = vec![pending, time_sub("a", "l1", 10.0, ts(2), true)];
        let levels = levels_with_par(&[("l1", 5.0)]);

        let board = totalizer_board(&subs, &levels, Direction::Ascending);

        assert_eq!(board.all[0].total, 10.0);
    }

    #[test]
    fn test_empty_category() {
        let board = totalizer_board(&[], &[], Direction::Ascending);
        assert!(board.all.is_empty());
        assert!(board.live.is_empty());
        assert_eq!(board.par_total, 0.0);
    }
}
