use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock instant in milliseconds. The kernel never reads the clock
/// itself; the host passes `now` into every step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed since `earlier`, saturating at zero.
    pub fn since(&self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn after(&self, delay: Millis) -> Millis {
        Millis(self.0.saturating_add(delay.0))
    }
}

pub trait Clock {
    fn now(&self) -> Millis;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Millis(ms)
    }
}

/// How often the host polls the reactor for due timers.
pub const TICK_MS: u64 = 50;
