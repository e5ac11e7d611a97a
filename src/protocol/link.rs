//! Link abstraction — the BLE GATT session to one controller.
//!
//! The engine writes command frames to the command characteristic and
//! expects the implementation to deliver every notification from the
//! notify characteristic to
//! [`ProtocolEngine::handle_notification`](crate::app::engine::ProtocolEngine::handle_notification),
//! either directly from its callback or through a
//! [`NotificationInbox`](super::channels::NotificationInbox).
//!
//! Scanning, bonding and reconnect backoff live behind this trait. The
//! engine only needs "connected, or fails".
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                                   | Perms       |
//! |---------------|----------------------------------------|-------------|
//! | Command       | `49535343-8841-43f4-a8d4-ecbe34729bb3` | Write (no rsp) |
//! | Notify        | `49535343-1e4d-4bd9-ba61-23c647249616` | Notify      |

// ── Constants ────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x49535343_fe7d_4ae5_8fa9_9fafd205e455;
pub const CHAR_COMMAND: u128 = 0x49535343_8841_43f4_a8d4_ecbe34729bb3;
pub const CHAR_NOTIFY: u128 = 0x49535343_1e4d_4bd9_ba61_23c647249616;

/// Byte-oriented command/notify session with one controller.
#[allow(async_fn_in_trait)]
pub trait Link {
    /// Error type for this link. Logged by the engine, then mapped to a
    /// [`TransportError`](crate::error::TransportError).
    type Error: core::fmt::Display;

    /// Whether the session is up and subscribed to notifications.
    fn is_connected(&self) -> bool;

    /// Establish the session and subscribe to the notify characteristic.
    async fn connect(&mut self) -> Result<(), Self::Error>;

    /// Write one complete frame to the command characteristic.
    async fn write(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Unsubscribe and tear the session down. Errors are swallowed.
    async fn disconnect(&mut self);
}
