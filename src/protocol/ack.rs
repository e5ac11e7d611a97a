//! Single-slot acknowledgement tracker.
//!
//! The protocol has no command identifiers: an ACK is simply the next
//! 4-byte notification after a write. Correlation therefore relies on at
//! most one command being in flight, which the engine enforces with its
//! link lock. The tracker only records that one expectation and its
//! deadline.
//!
//! ```text
//!   arm(deadline) ──▶ Pending ──resolve()──▶ Idle
//!                        │
//!                        └──poll(now ≥ deadline)──▶ Idle (TimedOut)
//! ```

use embassy_time::{Duration, Instant};
use log::error;

use crate::app::ports::Clock;
use crate::error::{Error, Result};

/// Outcome of checking the tracker at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPoll {
    /// Nothing is pending any more: the ACK arrived.
    Acknowledged,
    /// Still waiting, deadline not reached.
    Pending,
    /// Deadline passed without an ACK. The expectation has been cleared.
    TimedOut,
}

#[derive(Debug, Default)]
pub struct AckTracker {
    pending: Option<Instant>,
}

impl AckTracker {
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Record an expectation that must be met before `deadline`.
    pub fn arm(&mut self, deadline: Instant) -> Result<()> {
        if self.pending.is_some() {
            error!("ACK tracker armed twice; commands are not being serialized");
            return Err(Error::AlreadyPending);
        }
        self.pending = Some(deadline);
        Ok(())
    }

    /// An ACK arrived. Returns `false` for a stray ACK with nothing pending.
    pub fn resolve(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Abandon the pending expectation, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn poll(&mut self, now: Instant) -> AckPoll {
        match self.pending {
            None => AckPoll::Acknowledged,
            Some(deadline) if now >= deadline => {
                self.pending = None;
                AckPoll::TimedOut
            }
            Some(_) => AckPoll::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }
}

/// Suspend in `slice`-sized steps until `poll` reports the ACK or the
/// deadline. The last step is cut short so the wait never overruns
/// `deadline`.
///
/// `poll` is called with the current time and must forward to
/// [`AckTracker::poll`] on the shared tracker armed with `deadline`.
pub async fn wait_for_ack<C: Clock>(
    clock: &C,
    slice: Duration,
    deadline: Instant,
    mut poll: impl FnMut(Instant) -> AckPoll,
) -> Result<()> {
    loop {
        let now = clock.now();
        match poll(now) {
            AckPoll::Acknowledged => return Ok(()),
            AckPoll::TimedOut => return Err(Error::CommandTimeout),
            AckPoll::Pending => {
                let remaining = deadline.saturating_duration_since(now);
                clock.sleep(slice.min(remaining)).await;
            }
        }
    }
}
