//! Fuzz target: `decode_notification`
//!
//! Feeds arbitrary byte sequences to the notification classifier and
//! checks that it never panics and that decoded fields stay within what
//! the wire can carry.
//!
//! cargo fuzz run fuzz_notification_decoder

#![no_main]

use hello_fairy::protocol::codec::{NotificationEvent, decode_notification};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match decode_notification(data) {
        NotificationEvent::Ack => assert_eq!(data.len(), 4),
        NotificationEvent::StatusOff => assert!(data.len() >= 12),
        NotificationEvent::StatusColor { .. } => assert!(data.len() >= 14),
        NotificationEvent::StatusPreset { .. } => assert!(data.len() >= 11),
        NotificationEvent::Unrecognized => {}
    }
});
