//! Workout scheduling: which program comes next, and on which day.
//!
//! ## Rules
//!
//! 1. **Type**: strict A/B alternation from the last stored workout
//!    (no history → A). Failures and skipped days are ignored.
//! 2. **Date**: the program runs on a fixed set of weekdays. The next
//!    session is the nearest program day from today, today included,
//!    unless a workout was already logged today, in which case the search
//!    starts tomorrow. Missed days are not made up.

use crate::types::WorkoutType;
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Monday, Wednesday, Friday
pub const DEFAULT_PROGRAM_DAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Wed, Weekday::Fri];

/// The upcoming session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NextWorkout {
    pub workout_type: WorkoutType,
    pub date: NaiveDate,
}

/// Program type to do after `last` (A when there is no history)
pub fn next_workout_type(last: Option<WorkoutType>) -> WorkoutType {
    match last {
        Some(workout_type) => workout_type.alternate(),
        None => WorkoutType::A,
    }
}

/// First program day on or after `from`
///
/// Scans at most one week ahead using day-of-week indices (days from
/// Sunday, mod 7). With no program days configured, `from` is returned.
pub fn next_workout_day(from: NaiveDate, program_days: &[Weekday]) -> NaiveDate {
    let indices: Vec<u32> = program_days
        .iter()
        .map(|d| d.num_days_from_sunday())
        .collect();
    let current = from.weekday().num_days_from_sunday();

    for offset in 0..=7u32 {
        if indices.contains(&((current + offset) % 7)) {
            return from
                .checked_add_days(Days::new(u64::from(offset)))
                .unwrap_or(from);
        }
    }

    from
}

/// Date of the next session given the calendar date of the last one
pub fn next_workout_date(
    last_date: Option<NaiveDate>,
    today: NaiveDate,
    program_days: &[Weekday],
) -> NaiveDate {
    match last_date {
        Some(last) if last == today => {
            let tomorrow = today.succ_opt().unwrap_or(today);
            next_workout_day(tomorrow, program_days)
        }
        _ => next_workout_day(today, program_days),
    }
}

/// Combine the type and date rules
///
/// `last` carries the last workout's type and its local calendar date.
pub fn next_workout(
    last: Option<(WorkoutType, NaiveDate)>,
    today: NaiveDate,
    program_days: &[Weekday],
) -> NextWorkout {
    let next = NextWorkout {
        workout_type: next_workout_type(last.map(|(t, _)| t)),
        date: next_workout_date(last.map(|(_, d)| d), today, program_days),
    };

    tracing::debug!(
        "Next workout: {} on {} (last: {:?})",
        next.workout_type,
        next.date,
        last
    );

    next
}

/// Human label for a target date: "Today", "Tomorrow", or the weekday name
pub fn format_next_workout_date(date: NaiveDate, today: NaiveDate) -> String {
    match date.signed_duration_since(today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => weekday_name(date.weekday()).to_string(),
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-01-15 is a Monday
    fn monday() -> NaiveDate {
        date(2024, 1, 15)
    }

    #[test]
    fn test_first_workout_is_a() {
        assert_eq!(next_workout_type(None), WorkoutType::A);
        let next = next_workout(None, monday(), &DEFAULT_PROGRAM_DAYS);
        assert_eq!(next.workout_type, WorkoutType::A);
    }

    #[test]
    fn test_types_alternate_regardless_of_date() {
        let long_ago = date(2020, 6, 3);
        let next = next_workout(
            Some((WorkoutType::A, long_ago)),
            monday(),
            &DEFAULT_PROGRAM_DAYS,
        );
        assert_eq!(next.workout_type, WorkoutType::B);

        let next = next_workout(
            Some((WorkoutType::B, monday())),
            monday(),
            &DEFAULT_PROGRAM_DAYS,
        );
        assert_eq!(next.workout_type, WorkoutType::A);
    }

    #[test]
    fn test_program_day_returns_itself() {
        assert_eq!(next_workout_day(monday(), &DEFAULT_PROGRAM_DAYS), monday());
    }

    #[test]
    fn test_scans_forward_to_next_program_day() {
        // Tuesday -> Wednesday
        assert_eq!(
            next_workout_day(date(2024, 1, 16), &DEFAULT_PROGRAM_DAYS),
            date(2024, 1, 17)
        );
        // Saturday -> Monday
        assert_eq!(
            next_workout_day(date(2024, 1, 20), &DEFAULT_PROGRAM_DAYS),
            date(2024, 1, 22)
        );
    }

    #[test]
    fn test_no_history_today_if_program_day() {
        assert_eq!(
            next_workout_date(None, monday(), &DEFAULT_PROGRAM_DAYS),
            monday()
        );
    }

    #[test]
    fn test_trained_today_moves_strictly_after_today() {
        let next = next_workout_date(Some(monday()), monday(), &DEFAULT_PROGRAM_DAYS);
        assert!(next > monday());
        assert_eq!(next, date(2024, 1, 17));

        // Friday workout -> following Monday
        let friday = date(2024, 1, 19);
        assert_eq!(
            next_workout_date(Some(friday), friday, &DEFAULT_PROGRAM_DAYS),
            date(2024, 1, 22)
        );
    }

    #[test]
    fn test_trained_off_schedule_today_still_moves_forward() {
        let sunday = date(2024, 1, 21);
        assert_eq!(
            next_workout_date(Some(sunday), sunday, &DEFAULT_PROGRAM_DAYS),
            date(2024, 1, 22)
        );
    }

    #[test]
    fn test_missed_week_does_not_shift_cycle() {
        let two_weeks_ago = date(2024, 1, 1);
        assert_eq!(
            next_workout_date(Some(two_weeks_ago), monday(), &DEFAULT_PROGRAM_DAYS),
            monday()
        );
    }

    #[test]
    fn test_empty_program_days_returns_from() {
        assert_eq!(next_workout_day(monday(), &[]), monday());
    }

    #[test]
    fn test_custom_program_days() {
        let days = [Weekday::Tue, Weekday::Thu, Weekday::Sat];
        assert_eq!(next_workout_day(monday(), &days), date(2024, 1, 16));
    }

    #[test]
    fn test_format_labels() {
        let today = monday();
        assert_eq!(format_next_workout_date(today, today), "Today");
        assert_eq!(
            format_next_workout_date(date(2024, 1, 16), today),
            "Tomorrow"
        );
        assert_eq!(
            format_next_workout_date(date(2024, 1, 17), today),
            "Wednesday"
        );
        assert_eq!(
            format_next_workout_date(date(2024, 1, 22), today),
            "Monday"
        );
    }
}
