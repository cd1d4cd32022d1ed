use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::time_utils::TimeOfDay;

/// Stable identifier of a supervision session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

/// One scheduled supervision block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    /// Day of week, Sunday = 0
    pub day: u8,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub label: String,
    pub teacher: String,
    pub room: String,
    #[serde(default)]
    pub students: Vec<String>,
}

impl Session {
    /// Both bounds inclusive, so back-to-back sessions leave no gap.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    fn overlaps(&self, other: &Session) -> bool {
        self.day == other.day && self.start_time <= other.end_time && other.start_time <= self.end_time
    }
}

#[derive(Debug)]
pub enum ScheduleError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidTime { session: String, value: String },
    InvalidDay { session: String, day: u8 },
    DuplicateId(SessionId),
    UnsupportedFormat(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::Io(e) => write!(f, "failed to read schedule: {}", e),
            ScheduleError::Csv(e) => write!(f, "malformed schedule CSV: {}", e),
            ScheduleError::Json(e) => write!(f, "malformed schedule JSON: {}", e),
            ScheduleError::InvalidTime { session, value } => {
                write!(f, "session {}: invalid time {:?}, expected HH:MM", session, value)
            }
            ScheduleError::InvalidDay { session, day } => {
                write!(f, "session {}: day {} is outside 0-6 (Sunday = 0)", session, day)
            }
            ScheduleError::DuplicateId(id) => write!(f, "session id {} appears more than once", id),
            ScheduleError::UnsupportedFormat(ext) => {
                write!(f, "unsupported schedule format {:?}, use .csv or .json", ext)
            }
        }
    }
}

impl std::error::Error for ScheduleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScheduleError::Io(e) => Some(e),
            ScheduleError::Csv(e) => Some(e),
            ScheduleError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScheduleError {
    fn from(e: std::io::Error) -> Self {
        ScheduleError::Io(e)
    }
}

impl From<csv::Error> for ScheduleError {
    fn from(e: csv::Error) -> Self {
        ScheduleError::Csv(e)
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(e: serde_json::Error) -> Self {
        ScheduleError::Json(e)
    }
}

/// The read-only list of all sessions, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    sessions: Vec<Session>,
}

impl Schedule {
    pub fn new(sessions: Vec<Session>) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::new();
        for session in &sessions {
            if session.day > 6 {
                return Err(ScheduleError::InvalidDay {
                    session: session.id.to_string(),
                    day: session.day,
                });
            }
            if !seen.insert(&session.id) {
                return Err(ScheduleError::DuplicateId(session.id.clone()));
            }
        }
        Ok(Self { sessions })
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn for_day(&self, day: u8) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(move |s| s.day == day)
    }

    /// Pairs of same-day sessions whose time ranges intersect.
    /// Parallel rooms are allowed, so this is informational only.
    pub fn overlaps(&self) -> Vec<(SessionId, SessionId)> {
        let mut pairs = Vec::new();
        for (i, a) in self.sessions.iter().enumerate() {
            for b in &self.sessions[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }
}

/// Three-way answer to "is supervision happening right now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    None,
    Active,
    Upcoming,
}

/// Derived board status, recomputed on every status tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDescriptor {
    pub kind: StatusKind,
    pub current_sessions: Vec<Session>,
    pub next_session: Option<Session>,
    pub minutes_to_start: Option<i64>,
}

impl StatusDescriptor {
    pub fn none() -> Self {
        Self {
            kind: StatusKind::None,
            current_sessions: Vec::new(),
            next_session: None,
            minutes_to_start: None,
        }
    }
}

#[cfg(test)]
pub(crate) fn session(id: &str, day: u8, start: &str, end: &str) -> Session {
    Session {
        id: SessionId::from(id),
        day,
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        label: format!("Session {}", id),
        teacher: "Frau Test".to_string(),
        room: "100".to_string(),
        students: Vec::new(),
    }
}
