// System clock adapter - Wall-clock time via chrono

use crate::ports::ClockPort;

/// System clock adapter
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
