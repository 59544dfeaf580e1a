//! Injectable wall-clock time
//!
//! Invite validity and expiry sweeps depend on "now". Components take a
//! [`Clock`] handle instead of reading the system clock directly so tests
//! can pin time.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Wall-clock provider
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Default shared system clock
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}
