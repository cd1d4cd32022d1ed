use csv::Reader;
use log::{info, warn};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::time_utils::TimeOfDay;
use super::types::{Schedule, ScheduleError, Session, SessionId};

pub const STUDENTS_SPRACHJONGLEURE: [&str; 3] = ["Max (5.1)", "Lina (5a)", "Tom (6.1)"];
pub const STUDENTS_ASF1: [&str; 3] = ["Sara (7.1)", "Ben (7.1)", "Jonas (7.2)"];

/// One row of a schedule CSV. Students are joined with `;` in a single column.
#[derive(Debug, Deserialize)]
struct SessionRecord {
    id: String,
    day: u8,
    start_time: String,
    end_time: String,
    label: String,
    teacher: String,
    room: String,
    #[serde(default)]
    students: String,
}

impl SessionRecord {
    fn into_session(self) -> Result<Session, ScheduleError> {
        let start_time = parse_time(&self.id, &self.start_time)?;
        let end_time = parse_time(&self.id, &self.end_time)?;
        let students = self
            .students
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Session {
            id: SessionId(self.id.trim().to_string()),
            day: self.day,
            start_time,
            end_time,
            label: self.label.trim().to_string(),
            teacher: self.teacher.trim().to_string(),
            room: self.room.trim().to_string(),
            students,
        })
    }
}

fn parse_time(session: &str, value: &str) -> Result<TimeOfDay, ScheduleError> {
    value.parse().map_err(|_| ScheduleError::InvalidTime {
        session: session.to_string(),
        value: value.to_string(),
    })
}

/// Built-in weekly schedule used when no schedule file is configured
pub fn default_schedule() -> Schedule {
    let sessions = vec![
        Session {
            id: SessionId::from("1"),
            day: 1,
            start_time: TimeOfDay::at(13, 30),
            end_time: TimeOfDay::at(14, 15),
            label: "Sprachjongleure".to_string(),
            teacher: "Frau Müller".to_string(),
            room: "101".to_string(),
            students: STUDENTS_SPRACHJONGLEURE.iter().map(|s| s.to_string()).collect(),
        },
        Session {
            id: SessionId::from("2"),
            day: 1,
            start_time: TimeOfDay::at(14, 30),
            end_time: TimeOfDay::at(15, 15),
            label: "ASF 1".to_string(),
            teacher: "Herr Schmidt".to_string(),
            room: "102".to_string(),
            students: STUDENTS_ASF1.iter().map(|s| s.to_string()).collect(),
        },
    ];
    Schedule::new(sessions).unwrap_or_default()
}

/// Reads sessions from CSV with header
/// `id,day,start_time,end_time,label,teacher,room,students`
pub fn read_schedule_csv<R: Read>(reader: R) -> Result<Schedule, ScheduleError> {
    let mut reader = Reader::from_reader(reader);
    let mut sessions = Vec::new();
    for result in reader.deserialize::<SessionRecord>() {
        sessions.push(result?.into_session()?);
    }
    Schedule::new(sessions)
}

/// Reads sessions from a JSON array in the camelCase session shape
pub fn read_schedule_json<R: Read>(reader: R) -> Result<Schedule, ScheduleError> {
    let sessions: Vec<Session> = serde_json::from_reader(reader)?;
    Schedule::new(sessions)
}

/// Loads a schedule file, choosing the format by extension
pub fn load_schedule<P: AsRef<Path>>(path: P) -> Result<Schedule, ScheduleError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let schedule = match ext.as_str() {
        "csv" => read_schedule_csv(std::fs::File::open(path)?)?,
        "json" => read_schedule_json(std::fs::File::open(path)?)?,
        other => return Err(ScheduleError::UnsupportedFormat(other.to_string())),
    };

    info!("Loaded {} sessions from {}", schedule.sessions().len(), path.display());
    for (a, b) in schedule.overlaps() {
        warn!("Sessions {} and {} overlap on the same day", a, b);
    }
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "id,day,start_time,end_time,label,teacher,room,students
1,1,13:30,14:15,Sprachjongleure,Frau Müller,101,Max (5.1); Lina (5a);Tom (6.1)
2,1,14:30,15:15,ASF 1,Herr Schmidt,102,
";

    #[test]
    fn test_default_schedule_matches_board() {
        let schedule = default_schedule();
        assert_eq!(schedule.sessions().len(), 2);
        let first = &schedule.sessions()[0];
        assert_eq!(first.label, "Sprachjongleure");
        assert_eq!(first.start_time.to_string(), "13:30");
        assert_eq!(first.end_time.to_string(), "14:15");
        assert_eq!(schedule.sessions()[1].students.len(), 3);
        assert!(schedule.overlaps().is_empty());
    }

    #[test]
    fn test_read_csv() {
        let schedule = read_schedule_csv(CSV.as_bytes()).unwrap();
        let sessions = schedule.sessions();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].students, vec!["Max (5.1)", "Lina (5a)", "Tom (6.1)"]);
        assert!(sessions[1].students.is_empty());
        assert_eq!(sessions[1].end_time.to_string(), "15:15");
    }

    #[test]
    fn test_read_csv_rejects_bad_time() {
        let csv = "id,day,start_time,end_time,label,teacher,room,students\n\
                   x,1,1330,14:15,Broken,Nobody,1,\n";
        let err = read_schedule_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTime { ref value, .. } if value == "1330"));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("asf.csv");
        std::fs::write(&csv_path, CSV).unwrap();
        assert_eq!(load_schedule(&csv_path).unwrap().sessions().len(), 2);

        let json_path = dir.path().join("asf.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        write!(
            file,
            r#"[{{"id":"7","day":3,"startTime":"08:00","endTime":"08:45",
                "label":"Frühbetreuung","teacher":"Frau Kaya","room":"12"}}]"#
        )
        .unwrap();
        let schedule = load_schedule(&json_path).unwrap();
        assert_eq!(schedule.sessions()[0].day, 3);
        assert!(schedule.sessions()[0].students.is_empty());

        let txt_path = dir.path().join("asf.txt");
        std::fs::write(&txt_path, "").unwrap();
        assert!(matches!(
            load_schedule(&txt_path),
            Err(ScheduleError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_schedule(dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
    }
}
