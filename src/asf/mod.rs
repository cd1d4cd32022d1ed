pub mod types;
pub mod time_utils;
pub mod status;
pub mod alert;
pub mod roster;
pub mod store;
pub mod board;

pub use types::{Schedule, StatusKind};
pub use status::{compute_status, day_name, weekly_overview};
pub use store::{default_schedule, load_schedule};
pub use board::{BoardScheduler, BoardSnapshot, SystemClock};
