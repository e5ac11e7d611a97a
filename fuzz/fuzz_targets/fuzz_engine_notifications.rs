//! Fuzz target: `ProtocolEngine::handle_notification`
//!
//! Splits the input into notifications and pushes them through the engine.
//! Whatever arrives, the resulting state must stay within device ranges.
//!
//! cargo fuzz run fuzz_engine_notifications

#![no_main]

use hello_fairy::ProtocolEngine;
use hello_fairy::adapters::sim_link::SimulatedDevice;
use hello_fairy::adapters::time::EmbassyClock;
use hello_fairy::config::EngineConfig;
use hello_fairy::protocol::channels::NotificationInbox;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let inbox = NotificationInbox::new();
    let engine = ProtocolEngine::new(
        EngineConfig::default(),
        SimulatedDevice::new(&inbox),
        EmbassyClock::new(),
        (),
    );

    // First byte of each chunk is its length.
    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let len = usize::from(len).min(tail.len());
        let (chunk, tail) = tail.split_at(len);
        engine.handle_notification(chunk);
        rest = tail;
    }

    let state = engine.state();
    if let Some(hsv) = state.hsv {
        assert!(hsv.h <= 359 && hsv.s <= 100 && hsv.v <= 100);
    }
    if let Some(preset) = state.preset {
        assert!((1..=58).contains(&preset));
    }
    assert!(state.brightness.is_none_or(|b| b <= 100));
});
