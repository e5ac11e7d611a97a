//! Port traits — the hexagonal boundary between the engine and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProtocolEngine (domain)
//! ```
//!
//! Driven adapters (clocks, change sinks) implement these traits. The
//! [`ProtocolEngine`](super::engine::ProtocolEngine) consumes them via
//! generics, so the engine never touches a timer or a UI directly. The BLE
//! session port lives with the wire protocol in
//! [`protocol::link`](crate::protocol::link).

use embassy_time::{Duration, Instant};

use super::events::ChangeEvent;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time and suspension.
///
/// The ACK wait and the post-power-on settle delay both go through this
/// port, so tests can run the full 5 s timeout on simulated time.
#[allow(async_fn_in_trait)]
pub trait Clock {
    fn now(&self) -> Instant;

    /// Suspend the calling future only; other sessions keep running.
    async fn sleep(&self, duration: Duration);
}

impl<T: Clock> Clock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }

    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

// ───────────────────────────────────────────────────────────────
// Change sink port (driven adapter: domain → host / UI)
// ───────────────────────────────────────────────────────────────

/// The engine reports every state change through this port. Host layers
/// either use the carried snapshot or pull a fresh one afterwards.
///
/// Called from whichever task drove the change, including the
/// notification path, so implementations must not block.
pub trait ChangeSink {
    fn emit(&self, event: &ChangeEvent);
}

impl<T: ChangeSink + ?Sized> ChangeSink for &T {
    fn emit(&self, event: &ChangeEvent) {
        (**self).emit(event);
    }
}

/// Discards every event.
impl ChangeSink for () {
    fn emit(&self, _event: &ChangeEvent) {}
}
