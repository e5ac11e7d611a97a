//! Application core — device state and command orchestration.
//!
//! This module contains the rules for driving a Hello Fairy controller:
//! command sequencing, optimistic state, and notification handling. The
//! BLE session, the clock and change listeners are reached only through
//! **port traits** (see [`ports`] and [`crate::protocol::link`]), keeping
//! this layer fully testable without a radio.

pub mod color;
pub mod commands;
pub mod engine;
pub mod events;
pub mod ports;
pub mod state;
