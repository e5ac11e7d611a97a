//! Notification inbox.
//!
//! Uses an `embassy-sync` bounded channel to bridge the link's notification
//! callback (any thread) with the engine's notification pump.
//!
//! ```text
//! ┌──────────────┐  Notification  ┌──────────────────────┐
//! │ Link notify  │──────────────▶│ run_notifications()  │
//! │ callback     │               │ → handle_notification│
//! └──────────────┘               └──────────────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::Vec;
use log::warn;

/// Longest notification kept; status frames are well under this.
pub const MAX_NOTIFICATION_LEN: usize = 32;

/// Channel depth for inbound notifications.
pub const INBOX_DEPTH: usize = 8;

/// Raw notification bytes as delivered by the link.
pub type Notification = Vec<u8, MAX_NOTIFICATION_LEN>;

/// Inbound notification channel: link → engine.
pub type NotificationInbox = Channel<CriticalSectionRawMutex, Notification, INBOX_DEPTH>;

/// Copy `data` into the inbox without blocking. Returns `false` when the
/// notification was dropped (too long, or inbox full).
pub fn deliver_notification(inbox: &NotificationInbox, data: &[u8]) -> bool {
    let mut frame = Notification::new();
    if frame.extend_from_slice(data).is_err() {
        warn!("inbox: {}-byte notification too large, dropping", data.len());
        return false;
    }
    if inbox.try_send(frame).is_err() {
        warn!("inbox: channel full, dropping notification");
        return false;
    }
    true
}
