use log::{debug, info};
use std::io::{self, Write};

use super::types::{SessionId, StatusDescriptor, StatusKind};

/// Minutes before a session start at which the alert sounds
pub const ALERT_LEAD_MINUTES: i64 = 5;

/// Sound played in browsers that render the board
pub const BEEP_SOUND_URL: &str = "https://actions.google.com/sounds/v1/alarms/beep_short.ogg";

/// Something that can make the alert sound. Failures are reported but never acted upon.
pub trait AlertSink: Send {
    fn play(&mut self) -> io::Result<()>;
}

/// Rings the terminal bell on stdout
pub struct TerminalBell;

impl AlertSink for TerminalBell {
    fn play(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(b"\x07")?;
        out.flush()
    }
}

/// Sink for boards that have nobody listening, e.g. the web server
pub struct Silent;

impl AlertSink for Silent {
    fn play(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Edge detector that fires once per upcoming session when its countdown hits the lead time.
///
/// The countdown is only sampled on status ticks, so a sample sequence like 6 -> 4 never fires.
#[derive(Debug, Clone, Default)]
pub struct AlertTrigger {
    last_alerted: Option<SessionId>,
}

impl AlertTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_alerted(&self) -> Option<&SessionId> {
        self.last_alerted.as_ref()
    }

    /// Updates the remembered session and reports whether the alert is due now.
    pub fn observe(&mut self, status: &StatusDescriptor) -> bool {
        if status.kind == StatusKind::None {
            self.last_alerted = None;
            return false;
        }

        let Some(next) = status.next_session.as_ref() else {
            return false;
        };

        if status.minutes_to_start == Some(ALERT_LEAD_MINUTES)
            && self.last_alerted.as_ref() != Some(&next.id)
        {
            self.last_alerted = Some(next.id.clone());
            return true;
        }
        false
    }

    /// Observes `status` and plays the sink when due. Returns whether the alert fired.
    pub fn fire(&mut self, status: &StatusDescriptor, sink: &mut dyn AlertSink) -> bool {
        if !self.observe(status) {
            return false;
        }
        if let Some(next) = status.next_session.as_ref() {
            info!("{} starts in {} minutes, sounding alert", next.label, ALERT_LEAD_MINUTES);
        }
        if let Err(e) = sink.play() {
            debug!("alert playback failed: {}", e);
        }
        true
    }
}

#[cfg(test)]
pub(crate) struct RecordingSink {
    pub plays: usize,
    pub fail: bool,
}

#[cfg(test)]
impl AlertSink for RecordingSink {
    fn play(&mut self) -> io::Result<()> {
        self.plays += 1;
        if self.fail {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "autoplay blocked"))
        } else {
            Ok(())
        }
    }
}
