//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter       | Implements  | Connects to                      |
//! |---------------|-------------|----------------------------------|
//! | `log_sink`    | ChangeSink  | `log` facade                     |
//! | `signal_sink` | ChangeSink  | `embassy-sync` signal (latest)   |
//! | `sim_link`    | Link        | In-process emulated controller   |
//! | `time`        | Clock       | `embassy-time` driver            |

pub mod log_sink;
pub mod signal_sink;
pub mod sim_link;
pub mod time;
