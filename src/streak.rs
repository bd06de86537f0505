//! Tracking streaks
//!
//! A streak is a run of consecutive calendar days with at least one entry.
//! Only the set of tracked dates matters; how many entries a day has and
//! when they were logged does not.

use std::collections::BTreeSet;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::MoodEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    /// Run ending today or yesterday; 0 if the log went quiet before that
    pub current: u32,
    /// Longest run anywhere in the log
    pub longest: u32,
}

/// Distinct local dates with at least one entry, ascending
pub fn tracked_dates(entries: &[MoodEntry], offset: FixedOffset) -> BTreeSet<NaiveDate> {
    entries.iter().filter_map(|e| e.local_date(offset)).collect()
}

fn is_next_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    (later - earlier).num_days() == 1
}

/// Compute the current and longest streak as of `today`
pub fn calculate_streak(entries: &[MoodEntry], today: NaiveDate, offset: FixedOffset) -> Streak {
    let dates = tracked_dates(entries, offset);
    Streak {
        current: current_streak(&dates, today),
        longest: longest_streak(&dates),
    }
}

fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut descending = dates.iter().rev();

    let mut previous = match descending.next() {
        Some(latest) => *latest,
        None => return 0,
    };

    let yesterday = today.pred_opt().unwrap_or(today);
    if previous != today && previous != yesterday {
        return 0;
    }

    let mut current = 1;
    for date in descending {
        if !is_next_day(*date, previous) {
            break;
        }
        current += 1;
        previous = *date;
    }
    current
}

fn longest_streak(dates: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        run = match previous {
            Some(prev) if is_next_day(prev, *date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*date);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trends::test_support::*;

    fn entries_on(dates: &[NaiveDate]) -> Vec<MoodEntry> {
        dates
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let ts = d.and_hms_opt(12, 0, 0).unwrap().and_utc().timestamp_millis();
                MoodEntry::new(format!("e{i}"), ts, 4)
            })
            .collect()
    }

    #[test]
    fn test_empty_log() {
        let streak = calculate_streak(&[], date(2026, 2, 10), utc());
        assert_eq!(streak, Streak { current: 0, longest: 0 });
    }

    #[test]
    fn test_three_consecutive_days_ending_today() {
        let today = date(2026, 2, 10);
        let entries = entries_on(&[today, date(2026, 2, 9), date(2026, 2, 8)]);

        let streak = calculate_streak(&entries, today, utc());
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn test_gap_stops_current_streak() {
        let today = date(2026, 2, 10);
        let entries = entries_on(&[today, date(2026, 2, 5)]);

        let streak = calculate_streak(&entries, today, utc());
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn test_streak_ending_yesterday_is_current() {
        let today = date(2026, 2, 10);
        let entries = entries_on(&[date(2026, 2, 9), date(2026, 2, 8)]);

        assert_eq!(calculate_streak(&entries, today, utc()).current, 2);
    }

    #[test]
    fn test_stale_log_has_no_current_streak() {
        let today = date(2026, 2, 10);
        let entries = entries_on(&[date(2026, 2, 8), date(2026, 2, 7), date(2026, 2, 6)]);

        let streak = calculate_streak(&entries, today, utc());
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn test_longest_streak_across_gaps() {
        let today = date(2026, 3, 1);
        let entries = entries_on(&[
            date(2026, 2, 1),
            date(2026, 2, 2),
            date(2026, 2, 3),
            date(2026, 2, 4),
            date(2026, 2, 10),
            date(2026, 2, 27),
            date(2026, 2, 28),
            today,
        ]);

        let streak = calculate_streak(&entries, today, utc());
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 4);
    }

    #[test]
    fn test_entry_count_per_day_is_irrelevant() {
        let today = date(2026, 2, 10);
        let single = entries_on(&[today, date(2026, 2, 9)]);
        let mut many = single.clone();
        many.extend(entries_on(&[today, today, date(2026, 2, 9)]));
        many.push(entry_at("late", 2026, 2, 10, 23, 9));

        assert_eq!(
            calculate_streak(&single, today, utc()),
            calculate_streak(&many, today, utc())
        );
    }

    #[test]
    fn test_future_entries_do_not_count_as_current() {
        let today = date(2026, 2, 10);
        let entries = entries_on(&[date(2026, 2, 12)]);

        let streak = calculate_streak(&entries, today, utc());
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn test_tracked_dates_are_distinct() {
        let entries = vec![
            entry_at("a", 2026, 2, 2, 8, 3),
            entry_at("b", 2026, 2, 2, 20, 3),
            entry_at("c", 2026, 2, 1, 8, 3),
        ];
        let dates: Vec<NaiveDate> = tracked_dates(&entries, utc()).into_iter().collect();
        assert_eq!(dates, vec![date(2026, 2, 1), date(2026, 2, 2)]);
    }
}
