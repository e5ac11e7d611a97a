//! Hello Fairy BLE light controller protocol engine.
//!
//! Exposes the engine, the wire protocol and the bundled adapters. The
//! crate does no radio I/O itself: a host supplies a
//! [`Link`](protocol::link::Link) for its BLE stack.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod protocol;

pub use app::engine::{EffectOutcome, ProtocolEngine};
pub use error::{Error, Result};
