//! Hello Fairy wire protocol.
//!
//! Fixed-layout binary frames over a BLE write/notify characteristic pair.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Protocol Stack                          │
//! │                                                            │
//! │  ┌─────────┐   ┌──────────┐   ┌───────────────────────┐    │
//! │  │ Command │──▶│  Codec   │──▶│  Link (write)         │    │
//! │  └─────────┘   │ (frames) │   └───────────────────────┘    │
//! │                └──────────┘              │ notify          │
//! │                     ▲                    ▼                 │
//! │  ┌─────────┐        │         ┌───────────────────────┐    │
//! │  │   Ack   │◀───────┴─────────│  Inbox (channel)      │    │
//! │  │ tracker │                  └───────────────────────┘    │
//! │  └─────────┘                                               │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod ack;
pub mod channels;
pub mod codec;
pub mod command;
pub mod effects;
pub mod link;
