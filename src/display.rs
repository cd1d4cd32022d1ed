use chrono::{Datelike, NaiveDateTime};
use std::fmt::Write;

use crate::asf::roster::sort_roster;
use crate::asf::{day_name, weekly_overview, BoardSnapshot, Schedule, StatusKind};

const MONTH_NAMES: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September", "Oktober",
    "November", "Dezember",
];

/// Header message and color scheme for a status kind
pub struct Banner {
    pub message: &'static str,
    /// CSS class used by the HTML board
    pub style: &'static str,
    /// ANSI color used by the terminal board
    pub ansi: &'static str,
}

pub fn banner(kind: StatusKind) -> Banner {
    match kind {
        StatusKind::Active => Banner {
            message: "Anschlussförderung aktiv ❌",
            style: "urgent",
            ansi: "\x1b[1;41;97m",
        },
        StatusKind::Upcoming => Banner {
            message: "Gleich Anschlussförderung ⚠️",
            style: "warning",
            ansi: "\x1b[1;43;30m",
        },
        StatusKind::None => Banner {
            message: "Keine Anschlussförderung ✅",
            style: "calm",
            ansi: "\x1b[1;42;97m",
        },
    }
}

/// e.g. "Montag, 02. September"
pub fn format_long_date(now: NaiveDateTime) -> String {
    let weekday = day_name(now.weekday().num_days_from_sunday() as u8);
    let month = MONTH_NAMES[now.month0() as usize];
    format!("{}, {:02}. {}", weekday, now.day(), month)
}

pub fn format_clock(now: NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Minutes remaining, as shown next to the upcoming session
pub fn format_countdown(minutes: i64) -> String {
    match minutes {
        1 => "in 1 Minute".to_string(),
        m => format!("in {} Minuten", m),
    }
}

/// Renders the whole board for the terminal
pub fn render_board(snapshot: &BoardSnapshot) -> String {
    let status = &snapshot.status;
    let b = banner(status.kind);
    let mut out = String::new();

    let _ = writeln!(out, "{} {} \x1b[0m", b.ansi, b.message);
    let _ = writeln!(out, "{}", format_long_date(snapshot.now));
    let _ = writeln!(out, "{}", format_clock(snapshot.now));

    for session in &status.current_sessions {
        let _ = writeln!(out, "\nRaum {} - {} ({})", session.room, session.label, session.teacher);
        let _ = writeln!(out, "  bis {}", session.end_time);
        for student in sort_roster(&session.students) {
            let _ = writeln!(out, "  • {}", student);
        }
    }

    if let (Some(next), Some(minutes)) = (&status.next_session, status.minutes_to_start) {
        let heading = if status.kind == StatusKind::Active {
            "Danach"
        } else {
            "Nächste Anschlussförderung"
        };
        let _ = writeln!(
            out,
            "\n{}: {} um {} in Raum {} ({})",
            heading,
            next.label,
            next.start_time,
            next.room,
            format_countdown(minutes)
        );
    }

    if !snapshot.completed_today.is_empty() {
        let _ = writeln!(out, "\nErledigt ({}):", snapshot.completed_today.len());
        for session in &snapshot.completed_today {
            let _ = writeln!(out, "  {} - {} {}", session.start_time, session.end_time, session.label);
        }
    }

    out
}

/// Prints the weekly plan, one block per weekday
pub fn print_weekly_overview(schedule: &Schedule) {
    println!("\n=== Wochenplan ===");
    for group in weekly_overview(schedule) {
        println!("{}", group.name);
        for s in &group.sessions {
            println!("  {} - {}  {} • {} (Raum {})", s.start_time, s.end_time, s.label, s.teacher, s.room);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asf::{compute_status, default_schedule};
    use chrono::NaiveDate;

    fn snapshot_at(h: u32, m: u32) -> BoardSnapshot {
        let now = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap().and_hms_opt(h, m, 7).unwrap();
        let schedule = default_schedule();
        BoardSnapshot {
            now,
            status: compute_status(now, &schedule),
            completed_today: crate::asf::status::completed_today(now, &schedule),
            alerts_fired: 0,
            last_alerted: None,
        }
    }

    #[test]
    fn test_long_date_is_german() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(8, 0, 0).unwrap();
        assert_eq!(format_long_date(now), "Dienstag, 05. März");
        assert_eq!(format_clock(now), "08:00:00");
    }

    #[test]
    fn test_banner_per_kind() {
        assert_eq!(banner(StatusKind::Active).style, "urgent");
        assert_eq!(banner(StatusKind::Upcoming).style, "warning");
        assert_eq!(banner(StatusKind::None).message, "Keine Anschlussförderung ✅");
    }

    #[test]
    fn test_render_active_board_lists_sorted_roster_and_next() {
        let text = render_board(&snapshot_at(13, 40));
        assert!(text.contains("Anschlussförderung aktiv"));
        assert!(text.contains("Raum 101 - Sprachjongleure"));
        let max = text.find("Max (5.1)").unwrap();
        let lina = text.find("Lina (5a)").unwrap();
        let tom = text.find("Tom (6.1)").unwrap();
        assert!(max < lina && lina < tom);
        assert!(text.contains("Danach: ASF 1 um 14:30"));
        assert!(text.contains("in 50 Minuten"));
    }

    #[test]
    fn test_render_finished_day() {
        let text = render_board(&snapshot_at(16, 0));
        assert!(text.contains("Keine Anschlussförderung"));
        assert!(text.contains("Erledigt (2):"));
        assert!(!text.contains("Nächste"));
    }
}
