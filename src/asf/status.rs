use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use super::time_utils::TimeOfDay;
use super::types::{Schedule, Session, StatusDescriptor, StatusKind};

const DAY_NAMES: [&str; 7] = [
    "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
];

/// German weekday name for a Sunday = 0 day index
pub fn day_name(day: u8) -> &'static str {
    DAY_NAMES.get(day as usize).copied().unwrap_or("?")
}

/// Sunday = 0, matching the schedule's day convention
pub fn day_of(now: NaiveDateTime) -> u8 {
    now.weekday().num_days_from_sunday() as u8
}

/// Derives the board status for `now`. Pure: the schedule is only read.
pub fn compute_status(now: NaiveDateTime, schedule: &Schedule) -> StatusDescriptor {
    let today = day_of(now);
    let current_time = TimeOfDay::of(now);

    let current_sessions: Vec<Session> = schedule
        .for_day(today)
        .filter(|s| s.contains(current_time))
        .cloned()
        .collect();

    // min_by_key keeps the first of equal starts, like a stable sort would
    let next_session = schedule
        .for_day(today)
        .filter(|s| s.start_time > current_time)
        .min_by_key(|s| s.start_time)
        .cloned();

    let minutes_to_start = next_session
        .as_ref()
        .and_then(|next| next.start_time.on(now.date()))
        .map(|start| {
            let diff_ms = (start - now).num_milliseconds();
            ceil_div(diff_ms, 60_000)
        });

    let kind = if !current_sessions.is_empty() {
        StatusKind::Active
    } else if next_session.is_some() {
        StatusKind::Upcoming
    } else {
        StatusKind::None
    };

    StatusDescriptor {
        kind,
        current_sessions,
        next_session,
        minutes_to_start,
    }
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let q = value.div_euclid(divisor);
    if value.rem_euclid(divisor) == 0 {
        q
    } else {
        q + 1
    }
}

/// Today's sessions that have already ended, latest end first
pub fn completed_today(now: NaiveDateTime, schedule: &Schedule) -> Vec<Session> {
    let current_time = TimeOfDay::of(now);
    let mut done: Vec<Session> = schedule
        .for_day(day_of(now))
        .filter(|s| s.end_time < current_time)
        .cloned()
        .collect();
    done.sort_by(|a, b| b.end_time.cmp(&a.end_time));
    done
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub day: u8,
    pub name: &'static str,
    pub sessions: Vec<Session>,
}

/// Monday to Friday, each day sorted by start time; days without sessions are left out
pub fn weekly_overview(schedule: &Schedule) -> Vec<DayGroup> {
    (1..=5)
        .map(|day| {
            let mut sessions: Vec<Session> = schedule.for_day(day).cloned().collect();
            sessions.sort_by_key(|s| s.start_time);
            DayGroup {
                day,
                name: day_name(day),
                sessions,
            }
        })
        .filter(|g| !g.sessions.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asf::types::{session, SessionId};
    use chrono::NaiveDate;

    // 2024-09-02 is a Monday
    fn monday(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn two_monday_sessions() -> Schedule {
        Schedule::new(vec![
            session("A", 1, "13:30", "14:15"),
            session("B", 1, "14:30", "15:15"),
        ])
        .unwrap()
    }

    #[test]
    fn test_day_of_uses_sunday_zero() {
        assert_eq!(day_of(monday(12, 0, 0)), 1);
        let sunday = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(day_of(sunday), 0);
        assert_eq!(day_name(0), "Sonntag");
        assert_eq!(day_name(9), "?");
    }

    #[test]
    fn test_monday_scenario() {
        let schedule = two_monday_sessions();

        let before = compute_status(monday(13, 0, 0), &schedule);
        assert_eq!(before.kind, StatusKind::Upcoming);
        assert_eq!(before.next_session.as_ref().unwrap().id, SessionId::from("A"));
        assert_eq!(before.minutes_to_start, Some(30));
        assert!(before.current_sessions.is_empty());

        let during = compute_status(monday(13, 40, 0), &schedule);
        assert_eq!(during.kind, StatusKind::Active);
        assert_eq!(during.current_sessions.len(), 1);
        assert_eq!(during.current_sessions[0].id, SessionId::from("A"));
        assert_eq!(during.next_session.as_ref().unwrap().id, SessionId::from("B"));
        assert_eq!(during.minutes_to_start, Some(50));

        let after = compute_status(monday(15, 20, 0), &schedule);
        assert_eq!(after, StatusDescriptor::none());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let schedule = Schedule::new(vec![session("A", 1, "13:30", "14:15")]).unwrap();
        assert_eq!(compute_status(monday(13, 30, 0), &schedule).kind, StatusKind::Active);
        assert_eq!(compute_status(monday(14, 15, 59), &schedule).kind, StatusKind::Active);
        assert_eq!(compute_status(monday(13, 29, 0), &schedule).kind, StatusKind::Upcoming);
        assert_eq!(compute_status(monday(14, 16, 0), &schedule).kind, StatusKind::None);
    }

    #[test]
    fn test_minutes_round_up() {
        let schedule = two_monday_sessions();
        // 13:29:30 -> 30 seconds left, still counts as one minute
        assert_eq!(compute_status(monday(13, 29, 30), &schedule).minutes_to_start, Some(1));
        assert_eq!(compute_status(monday(13, 24, 1), &schedule).minutes_to_start, Some(6));
        assert_eq!(compute_status(monday(13, 25, 0), &schedule).minutes_to_start, Some(5));
    }

    #[test]
    fn test_countdown_decreases_through_the_day() {
        let schedule = two_monday_sessions();
        let mut last = i64::MAX;
        for minute in 0..30 {
            let status = compute_status(monday(13, minute, 0), &schedule);
            let mins = status.minutes_to_start.unwrap();
            assert!(mins >= 0);
            assert!(mins < last);
            last = mins;
        }
    }

    #[test]
    fn test_no_sessions_today() {
        let schedule = two_monday_sessions();
        let tuesday = NaiveDate::from_ymd_opt(2024, 9, 3).unwrap().and_hms_opt(13, 40, 0).unwrap();
        let status = compute_status(tuesday, &schedule);
        assert_eq!(status.kind, StatusKind::None);
        assert!(status.next_session.is_none());
        assert!(status.minutes_to_start.is_none());
    }

    #[test]
    fn test_parallel_sessions_all_reported() {
        let schedule = Schedule::new(vec![
            session("A", 1, "13:30", "14:15"),
            session("B", 1, "13:30", "14:15"),
            session("C", 2, "13:30", "14:15"),
        ])
        .unwrap();
        let status = compute_status(monday(13, 45, 0), &schedule);
        let ids: Vec<_> = status.current_sessions.iter().map(|s| s.id.0.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_next_session_is_earliest_regardless_of_order() {
        let schedule = Schedule::new(vec![
            session("late", 1, "16:00", "17:00"),
            session("early", 1, "14:30", "15:15"),
        ])
        .unwrap();
        let status = compute_status(monday(12, 0, 0), &schedule);
        assert_eq!(status.next_session.unwrap().id, SessionId::from("early"));
    }

    #[test]
    fn test_compute_status_is_idempotent() {
        let schedule = two_monday_sessions();
        let copy = schedule.clone();
        let now = monday(13, 40, 12);
        assert_eq!(compute_status(now, &schedule), compute_status(now, &schedule));
        assert_eq!(schedule, copy);
    }

    #[test]
    fn test_completed_today_latest_first() {
        let schedule = two_monday_sessions();
        assert!(completed_today(monday(14, 15, 0), &schedule).is_empty());
        let done = completed_today(monday(15, 20, 0), &schedule);
        let ids: Vec<_> = done.iter().map(|s| s.id.0.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn test_weekly_overview_groups_weekdays() {
        let schedule = Schedule::new(vec![
            session("b", 3, "15:00", "16:00"),
            session("a", 3, "13:00", "14:00"),
            session("m", 1, "13:30", "14:15"),
            session("sun", 0, "10:00", "11:00"),
        ])
        .unwrap();
        let groups = weekly_overview(&schedule);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Montag");
        assert_eq!(groups[1].name, "Mittwoch");
        let ids: Vec<_> = groups[1].sessions.iter().map(|s| s.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
