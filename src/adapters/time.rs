//! `embassy-time` clock adapter.
//!
//! Implements [`Clock`] on top of the `embassy-time` driver. On host builds
//! the `std` driver backs it with the OS monotonic clock.

use embassy_time::{Duration, Instant, Timer};

use crate::app::ports::Clock;

/// Clock backed by the global `embassy-time` driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl EmbassyClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        Timer::after(duration).await;
    }
}
