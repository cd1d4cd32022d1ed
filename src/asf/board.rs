use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle, time};

use super::alert::{AlertSink, AlertTrigger};
use super::status::{completed_today, compute_status};
use super::types::{Schedule, Session, SessionId, StatusDescriptor};

/// Refresh of the visible clock
pub const DISPLAY_TICK: Duration = Duration::from_secs(1);
/// Re-evaluation of the session status and the alert
pub const STATUS_TICK: Duration = Duration::from_secs(30);

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub now: NaiveDateTime,
    pub status: StatusDescriptor,
    pub completed_today: Vec<Session>,
    pub alerts_fired: u64,
    pub last_alerted: Option<SessionId>,
}

struct BoardState {
    display_time: NaiveDateTime,
    status: StatusDescriptor,
    trigger: AlertTrigger,
    alerts_fired: u64,
    sink: Box<dyn AlertSink>,
}

type DisplayHook = Arc<dyn Fn(&BoardSnapshot) + Send + Sync>;

/// Owns the board's clock-driven state: the latest status and the alert memory.
#[derive(Clone)]
pub struct BoardScheduler {
    schedule: Arc<Schedule>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<BoardState>>,
    on_display: Option<DisplayHook>,
    tickers: Arc<Mutex<Vec<JoinHandle<()>>>>,
    display_interval: Duration,
    status_interval: Duration,
}

impl BoardScheduler {
    pub fn new(schedule: Schedule, clock: Arc<dyn Clock>, sink: Box<dyn AlertSink>) -> Self {
        let display_time = clock.now();
        Self {
            schedule: Arc::new(schedule),
            clock,
            state: Arc::new(Mutex::new(BoardState {
                display_time,
                status: StatusDescriptor::none(),
                trigger: AlertTrigger::new(),
                alerts_fired: 0,
                sink,
            })),
            on_display: None,
            tickers: Arc::new(Mutex::new(Vec::new())),
            display_interval: DISPLAY_TICK,
            status_interval: STATUS_TICK,
        }
    }

    /// Called after every display tick with the fresh snapshot
    pub fn with_display<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BoardSnapshot) + Send + Sync + 'static,
    {
        self.on_display = Some(Arc::new(hook));
        self
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Re-runs the status engine, replacing the previous descriptor, and feeds the alert trigger.
    pub async fn recompute(&self) -> StatusDescriptor {
        let now = self.clock.now();
        let status = compute_status(now, &self.schedule);

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.status.kind != status.kind {
            debug!("Board status {:?} -> {:?}", state.status.kind, status.kind);
        }
        if state.trigger.fire(&status, state.sink.as_mut()) {
            state.alerts_fired += 1;
        }
        state.status = status.clone();
        status
    }

    /// Samples the clock for display only; the status is left as it is.
    pub async fn refresh_display(&self) -> BoardSnapshot {
        let snapshot = {
            let mut guard = self.state.lock().await;
            guard.display_time = self.clock.now();
            self.build_snapshot(&guard)
        };
        if let Some(hook) = &self.on_display {
            hook(&snapshot);
        }
        snapshot
    }

    pub async fn snapshot(&self) -> BoardSnapshot {
        let guard = self.state.lock().await;
        self.build_snapshot(&guard)
    }

    fn build_snapshot(&self, state: &BoardState) -> BoardSnapshot {
        BoardSnapshot {
            now: state.display_time,
            status: state.status.clone(),
            completed_today: completed_today(state.display_time, &self.schedule),
            alerts_fired: state.alerts_fired,
            last_alerted: state.trigger.last_alerted().cloned(),
        }
    }

    /// Spawns the display and status tickers, replacing any running ones.
    /// Both fire once immediately.
    pub async fn start(&self) {
        let mut tickers = self.tickers.lock().await;
        for handle in tickers.drain(..) {
            handle.abort();
        }

        let board = self.clone();
        let status_interval = self.status_interval;
        tickers.push(tokio::spawn(async move {
            let mut interval = time::interval(status_interval);
            loop {
                interval.tick().await;
                board.recompute().await;
            }
        }));

        let board = self.clone();
        let display_interval = self.display_interval;
        tickers.push(tokio::spawn(async move {
            let mut interval = time::interval(display_interval);
            loop {
                interval.tick().await;
                board.refresh_display().await;
            }
        }));

        info!(
            "Board started for {} sessions (display every {:?}, status every {:?})",
            self.schedule.sessions().len(),
            self.display_interval,
            self.status_interval
        );
    }

    pub async fn stop(&self) {
        let mut tickers = self.tickers.lock().await;
        for handle in tickers.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
pub(crate) struct FixedClock(pub std::sync::Mutex<NaiveDateTime>);

#[cfg(test)]
impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Arc<Self> {
        Arc::new(Self(std::sync::Mutex::new(now)))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.0.lock().unwrap() = now;
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}
