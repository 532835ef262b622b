//! Injectable clock source.
//!
//! Nothing in this workspace calls `chrono::Utc::now()` or
//! `SystemTime::now()` directly outside of [`SystemClock`]. Every
//! component that needs "now" takes a `&dyn Clock` (or a generic `C:
//! Clock`) so tests can hold time fixed.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Reads the OS clock. The only `Clock` implementation allowed to touch
/// the outside world.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always returns a fixed instant, or one advanced
/// explicitly by the test. Used in place of `SystemClock` anywhere a
/// test needs deterministic expiry/ordering behavior.
pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write() = now;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.now.write();
        *guard += duration;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read()
    }
}
