//! Unified error types for the protocol engine.
//!
//! A single `Error` enum that every command path funnels into, keeping the
//! caller's error handling uniform. All variants are `Copy` so they can be
//! returned from inside critical sections without allocation.
//!
//! Malformed inbound notifications are never errors: the engine drops them
//! with a debug trace. An unknown effect name is not an error either, see
//! [`EffectOutcome`](crate::app::engine::EffectOutcome).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level engine error
// ---------------------------------------------------------------------------

/// Every fallible engine operation returns this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The link could not connect or the frame write failed.
    Transport(TransportError),
    /// No acknowledgement arrived before the ack deadline.
    CommandTimeout,
    /// A command was armed while another one was still awaiting its ack.
    AlreadyPending,
    /// An outbound frame could not be built.
    Frame(FrameError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::CommandTimeout => write!(f, "no ACK received before the deadline"),
            Self::AlreadyPending => write!(f, "a command is already awaiting its ACK"),
            Self::Frame(e) => write!(f, "frame: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Link failures. The link's own error value is logged where it occurs and
/// mapped onto one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Connecting (or subscribing to notifications) failed.
    ConnectFailed,
    /// Writing the command characteristic failed.
    WriteFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Frame errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Payload does not fit in a single command frame.
    PayloadTooLong(usize),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooLong(len) => write!(f, "payload of {len} bytes does not fit a frame"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
