//! Command frame encoder and notification decoder.
//!
//! Outbound wire format:
//! ```text
//! ┌──────┬──────┬─────┬────────────────────┬──────────┐
//! │ 0xAA │ Kind │ Len │ Payload (Len B)    │ Checksum │
//! └──────┴──────┴─────┴────────────────────┴──────────┘
//! ```
//! The checksum is the sum of every preceding byte, mod 256.
//!
//! Inbound notifications carry no checksum check: the device does not send
//! one we can rely on, so frames are trusted as delivered by the link and
//! classified purely by length and the power/mode bytes at offsets 6 and 7.

use heapless::Vec;

use crate::error::FrameError;

/// First byte of every outbound command frame.
pub const FRAME_PREFIX: u8 = 0xAA;

/// Largest payload a command frame can carry.
pub const MAX_PAYLOAD_LEN: usize = 12;

/// Prefix + kind + length + payload + checksum.
pub const MAX_FRAME_LEN: usize = MAX_PAYLOAD_LEN + 4;

/// Acknowledgements are always exactly this long.
pub const ACK_LEN: usize = 4;

const POWER_OFFSET: usize = 6;
const MODE_OFFSET: usize = 7;
const STATUS_MIN_LEN: usize = 12;
const STATUS_COLOR_MIN_LEN: usize = 14;
const STATUS_PRESET_MIN_LEN: usize = 11;

/// Mode byte shared by colour/preset payloads and status notifications.
pub const MODE_COLOR: u8 = 0x01;
pub const MODE_PRESET: u8 = 0x02;

/// Command discriminant (byte 1 of an outbound frame).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandKind {
    Power = 0x02,
    ColorPreset = 0x03,
}

/// A checksummed outbound command frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_LEN>,
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn kind(&self) -> u8 {
        self.bytes[1]
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[3..self.bytes.len() - 1]
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[self.bytes.len() - 1]
    }
}

impl core::ops::Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Sum of `bytes`, mod 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Whether the last byte of `frame` is the checksum of the bytes before it.
pub fn verify_checksum(frame: &[u8]) -> bool {
    match frame.split_last() {
        Some((last, body)) => checksum(body) == *last,
        None => false,
    }
}

/// Build `[0xAA, kind, len, payload..., checksum]`.
pub fn encode_command(kind: CommandKind, payload: &[u8]) -> Result<Frame, FrameError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(FrameError::PayloadTooLong(payload.len()));
    }

    let mut bytes: Vec<u8, MAX_FRAME_LEN> = Vec::new();
    // Capacity was checked above; none of these pushes can fail.
    let _ = bytes.push(FRAME_PREFIX);
    let _ = bytes.push(kind as u8);
    let _ = bytes.push(payload.len() as u8);
    let _ = bytes.extend_from_slice(payload);
    let sum = checksum(&bytes);
    let _ = bytes.push(sum);

    Ok(Frame { bytes })
}

/// What an inbound notification means to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// The device acknowledged the last command.
    Ack,
    /// The device reports it is off.
    StatusOff,
    /// The device is on and showing a solid HSV colour.
    StatusColor { h: u16, s: u8, v: u8 },
    /// The device is on and running a preset effect.
    StatusPreset { preset: u8, brightness: u8 },
    /// Anything else; dropped by the engine.
    Unrecognized,
}

fn be_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

/// Tenths-of-percent on the wire to whole percent.
fn tenths(raw: u16) -> u8 {
    (raw / 10).min(u16::from(u8::MAX)) as u8
}

/// Classify an inbound notification.
pub fn decode_notification(data: &[u8]) -> NotificationEvent {
    if data.len() == ACK_LEN {
        return NotificationEvent::Ack;
    }

    if data.len() >= STATUS_MIN_LEN && data[POWER_OFFSET] == 0 {
        return NotificationEvent::StatusOff;
    }

    if data.len() >= STATUS_COLOR_MIN_LEN
        && data[POWER_OFFSET] == 1
        && data[MODE_OFFSET] == MODE_COLOR
    {
        return NotificationEvent::StatusColor {
            h: be_u16(data, 8),
            s: tenths(be_u16(data, 10)),
            v: tenths(be_u16(data, 12)),
        };
    }

    if data.len() >= STATUS_PRESET_MIN_LEN && data[MODE_OFFSET] == MODE_PRESET {
        return NotificationEvent::StatusPreset {
            preset: data[8],
            brightness: tenths(be_u16(data, 9)),
        };
    }

    NotificationEvent::Unrecognized
}
