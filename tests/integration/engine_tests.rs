//! Integration tests for the command pipeline: sequencing, ACK handling
//! and optimistic state, observed through the frames written to the link.

use futures_lite::future::{block_on, poll_once, zip};

use hello_fairy::app::color::{Hsv, Rgb};
use hello_fairy::app::commands::LightRequest;
use hello_fairy::app::events::ChangeEvent;
use hello_fairy::app::state::Mode;
use hello_fairy::config::EngineConfig;
use hello_fairy::error::TransportError;
use hello_fairy::{EffectOutcome, Error};

use super::mock_link::{Rig, drive};

const POWER_ON: [u8; 5] = [0xAA, 0x02, 0x01, 0x01, 0xAE];
const POWER_OFF: [u8; 5] = [0xAA, 0x02, 0x01, 0x00, 0xAD];

fn close(a: u8, b: u8) -> bool {
    a.abs_diff(b) <= 1
}

// ── Power ─────────────────────────────────────────────────────

#[test]
fn power_on_sends_one_frame_and_updates_state() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();

    assert_eq!(rig.probe.frames(), vec![POWER_ON.to_vec()]);
    assert_eq!(engine.state().power, Some(true));
    assert!(!engine.ack_pending());
    assert!(matches!(rig.sink.last(), Some(ChangeEvent::Applied(s)) if s.is_on()));
}

#[test]
fn repeated_power_request_is_idempotent() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();

    assert_eq!(rig.probe.frame_count(), 1);
}

#[test]
fn power_off_clears_mode_and_colour() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_color_hsv(120, 100, 100)).unwrap();
    drive(&engine, &rig.inbox, engine.turn_off()).unwrap();

    assert_eq!(rig.probe.last_frame(), Some(POWER_OFF.to_vec()));
    let state = engine.state();
    assert_eq!(state.power, Some(false));
    assert_eq!((state.mode, state.hsv, state.preset), (None, None, None));
}

#[test]
fn first_command_connects_on_demand() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();
    drive(&engine, &rig.inbox, engine.set_power(false)).unwrap();

    assert_eq!(rig.probe.connect_calls.get(), 1);
}

// ── ACK handling ──────────────────────────────────────────────

#[test]
fn missing_ack_times_out_after_five_seconds() {
    let rig = Rig::new();
    let engine = rig.engine();
    rig.probe.auto_ack.set(false);

    let result = drive(&engine, &rig.inbox, engine.set_power(true));

    assert_eq!(result, Err(Error::CommandTimeout));
    assert_eq!(rig.clock.now_ms(), 5000);
    assert!(!engine.ack_pending());
    assert_eq!(engine.state().power, None, "state must not change without an ACK");
    assert_eq!(rig.probe.frame_count(), 1, "no retry");
}

#[test]
fn command_after_timeout_succeeds() {
    let rig = Rig::new();
    let engine = rig.engine();
    rig.probe.auto_ack.set(false);
    assert!(drive(&engine, &rig.inbox, engine.set_power(true)).is_err());

    rig.probe.auto_ack.set(true);
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();

    assert_eq!(engine.state().power, Some(true));
}

#[test]
fn shorter_configured_timeout_is_honoured() {
    let rig = Rig::new();
    let engine = rig.engine_with(EngineConfig {
        ack_timeout_ms: 1200,
        ..EngineConfig::default()
    });
    rig.probe.auto_ack.set(false);

    assert_eq!(
        drive(&engine, &rig.inbox, engine.set_power(true)),
        Err(Error::CommandTimeout)
    );
    assert_eq!(rig.clock.now_ms(), 1200);
}

#[test]
fn coarse_poll_interval_never_overruns_timeout() {
    let rig = Rig::new();
    let engine = rig.engine_with(EngineConfig {
        ack_poll_interval_ms: 3000,
        ..EngineConfig::default()
    });
    assert_eq!(engine.config().ack_poll_interval_ms, 3000, "config is valid");
    rig.probe.auto_ack.set(false);

    let result = drive(&engine, &rig.inbox, engine.set_power(true));

    assert_eq!(result, Err(Error::CommandTimeout));
    assert_eq!(rig.clock.now_ms(), 5000);
    assert_eq!(rig.clock.sleeps(), vec![3000, 2000]);
    assert!(!engine.ack_pending());
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let rig = Rig::new();
    let engine = rig.engine_with(EngineConfig {
        ack_timeout_ms: 60_000,
        ..EngineConfig::default()
    });
    assert_eq!(engine.config(), &EngineConfig::default());
}

#[test]
fn write_failure_disarms_tracker() {
    let rig = Rig::new();
    let engine = rig.engine();
    rig.probe.fail_write.set(true);

    let result = drive(&engine, &rig.inbox, engine.set_power(true));

    assert_eq!(result, Err(Error::Transport(TransportError::WriteFailed)));
    assert!(!engine.ack_pending());
    assert_eq!(engine.state().power, None);

    rig.probe.fail_write.set(false);
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();
}

#[test]
fn connect_failure_sends_nothing() {
    let rig = Rig::new();
    let engine = rig.engine();
    rig.probe.fail_connect.set(true);

    let result = drive(&engine, &rig.inbox, engine.set_power(true));

    assert_eq!(result, Err(Error::Transport(TransportError::ConnectFailed)));
    assert_eq!(rig.probe.frame_count(), 0);
    assert!(!engine.ack_pending());
}

#[test]
fn cancelled_command_disarms_tracker() {
    let rig = Rig::new();
    let engine = rig.engine();
    rig.probe.auto_ack.set(false);

    let mut pending = Box::pin(engine.set_power(true));
    assert!(block_on(poll_once(pending.as_mut())).is_none());
    assert!(engine.ack_pending());
    drop(pending);

    assert!(!engine.ack_pending());
    rig.probe.auto_ack.set(true);
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();
}

#[test]
fn concurrent_commands_queue_in_call_order() {
    let rig = Rig::new();
    let engine = rig.engine();
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();

    let (color, preset) = drive(
        &engine,
        &rig.inbox,
        zip(engine.set_color_hsv(10, 20, 30), engine.set_preset(17)),
    );

    assert_eq!(color, Ok(()));
    assert_eq!(preset, Ok(()));
    let frames = rig.probe.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0], POWER_ON.to_vec());
    assert_eq!(frames[1][3], 0x01, "colour second");
    assert_eq!(&frames[2][3..5], &[0x02, 17], "preset last");

    // Every write was answered before the next one went out.
    let events = rig.sink.events.borrow();
    let kinds: Vec<_> = events
        .iter()
        .map(|e| match e {
            ChangeEvent::Acknowledged(_) => 'k',
            ChangeEvent::Applied(_) => 'a',
            ChangeEvent::Reported(_) => 'r',
        })
        .collect();
    assert_eq!(kinds, vec!['k', 'a', 'k', 'a', 'k', 'a']);
    assert!(!engine.ack_pending());
    assert_eq!(engine.state().preset, Some(17));
}

#[test]
fn disconnect_drops_session() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.connect()).unwrap();
    assert!(rig.probe.connected.get());
    block_on(engine.disconnect());
    assert!(!rig.probe.connected.get());

    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();
    assert_eq!(rig.probe.connect_calls.get(), 2);
}

// ── Colour ────────────────────────────────────────────────────

#[test]
fn colour_from_unknown_power_turns_on_first_and_settles() {
    let rig = Rig::new();
    let engine = rig.engine_with(EngineConfig {
        settle_delay_ms: 250,
        ..EngineConfig::default()
    });

    drive(&engine, &rig.inbox, engine.set_color_hsv(120, 100, 40)).unwrap();

    let frames = rig.probe.frames();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0], POWER_ON.to_vec());
    assert_eq!(
        frames[1],
        vec![0xAA, 0x03, 0x07, 0x01, 0x00, 0x78, 0x03, 0xE8, 0x01, 0x90, 0xA9]
    );
    // ACK poll, settle, ACK poll.
    assert_eq!(rig.clock.sleeps(), vec![100, 250, 100]);
}

#[test]
fn colour_when_already_on_sends_single_frame() {
    let rig = Rig::new();
    let engine = rig.engine();
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();

    drive(&engine, &rig.inbox, engine.set_color_hsv(10, 20, 30)).unwrap();

    assert_eq!(rig.probe.frame_count(), 2);
}

#[test]
fn hsv_components_are_clamped() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_color_hsv(400, 120, 150)).unwrap();

    let frame = rig.probe.last_frame().unwrap();
    assert_eq!(&frame[3..10], &[0x01, 0x01, 0x67, 0x03, 0xE8, 0x03, 0xE8]);
    let state = engine.state();
    assert_eq!(state.hsv, Some(Hsv { h: 359, s: 100, v: 100 }));
    assert_eq!(state.mode, Some(Mode::Color));
    assert_eq!(state.brightness, Some(100));
}

#[test]
fn rgb_round_trips_within_one_step() {
    for (r, g, b) in [(255, 0, 0), (0, 128, 255), (255, 120, 0), (10, 200, 30), (0, 0, 255)] {
        let rig = Rig::new();
        let engine = rig.engine();

        drive(&engine, &rig.inbox, engine.set_color_rgb(r, g, b)).unwrap();

        let rgb = engine.state().rgb.unwrap();
        assert!(
            close(rgb.r, r) && close(rgb.g, g) && close(rgb.b, b),
            "({r}, {g}, {b}) came back as {rgb:?}"
        );
    }
}

#[test]
fn rgb_converts_to_expected_hsv() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_color_rgb(10, 200, 30)).unwrap();

    assert_eq!(engine.state().hsv, Some(Hsv { h: 126, s: 95, v: 78 }));
}

#[test]
fn black_keeps_previous_brightness() {
    let rig = Rig::new();
    let engine = rig.engine();
    drive(&engine, &rig.inbox, engine.set_color_hsv(120, 100, 40)).unwrap();

    drive(&engine, &rig.inbox, engine.set_color_rgb(0, 0, 0)).unwrap();

    assert_eq!(engine.state().hsv, Some(Hsv { h: 0, s: 0, v: 40 }));
}

#[test]
fn black_without_history_uses_default_brightness() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_color_rgb(0, 0, 0)).unwrap();

    assert_eq!(engine.state().hsv, Some(Hsv { h: 0, s: 0, v: 50 }));
    assert_eq!(engine.state().rgb, Some(Rgb { r: 128, g: 128, b: 128 }));
}

// ── Brightness ────────────────────────────────────────────────

#[test]
fn brightness_is_ignored_while_off() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_brightness(30)).unwrap();

    assert_eq!(rig.probe.frame_count(), 0);
    assert_eq!(engine.state().brightness, None);
}

#[test]
fn brightness_without_colour_turns_white() {
    let rig = Rig::new();
    let engine = rig.engine();
    drive(&engine, &rig.inbox, engine.set_power(true)).unwrap();

    drive(&engine, &rig.inbox, engine.set_brightness(30)).unwrap();

    assert_eq!(engine.state().hsv, Some(Hsv { h: 0, s: 0, v: 30 }));
}

#[test]
fn brightness_keeps_hue_and_saturation_and_clamps() {
    let rig = Rig::new();
    let engine = rig.engine();
    drive(&engine, &rig.inbox, engine.set_color_hsv(200, 80, 60)).unwrap();

    drive(&engine, &rig.inbox, engine.set_brightness(150)).unwrap();

    assert_eq!(engine.state().hsv, Some(Hsv { h: 200, s: 80, v: 100 }));
}

// ── Presets and effects ───────────────────────────────────────

#[test]
fn preset_is_clamped_and_uses_default_brightness() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.set_preset(99)).unwrap();
    assert_eq!(
        rig.probe.last_frame(),
        Some(vec![0xAA, 0x03, 0x04, 0x02, 0x3A, 0x01, 0xF4, 0xE2])
    );

    drive(&engine, &rig.inbox, engine.set_preset(0)).unwrap();
    assert_eq!(
        rig.probe.last_frame(),
        Some(vec![0xAA, 0x03, 0x04, 0x02, 0x01, 0x01, 0xF4, 0xA9])
    );
    let state = engine.state();
    assert_eq!(state.mode, Some(Mode::Preset));
    assert_eq!(state.preset, Some(1));
    assert_eq!((state.hsv, state.rgb), (None, None));
}

#[test]
fn preset_reuses_known_brightness() {
    let rig = Rig::new();
    let engine = rig.engine();
    drive(&engine, &rig.inbox, engine.set_color_hsv(0, 0, 30)).unwrap();

    drive(&engine, &rig.inbox, engine.set_preset(5)).unwrap();

    let frame = rig.probe.last_frame().unwrap();
    assert_eq!(&frame[3..7], &[0x02, 0x05, 0x01, 0x2C]);
    assert_eq!(engine.state().brightness, Some(30));
}

#[test]
fn named_effect_sends_its_preset() {
    let rig = Rig::new();
    let engine = rig.engine();

    let outcome = drive(&engine, &rig.inbox, engine.set_effect("Fireworks")).unwrap();

    assert_eq!(outcome, EffectOutcome::Applied(17));
    assert_eq!(
        rig.probe.last_frame(),
        Some(vec![0xAA, 0x03, 0x04, 0x02, 0x11, 0x01, 0xF4, 0xB9])
    );
    assert_eq!(engine.current_effect(), Some("Fireworks"));
}

#[test]
fn unknown_effect_sends_nothing() {
    let rig = Rig::new();
    let engine = rig.engine();

    let outcome = drive(&engine, &rig.inbox, engine.set_effect("NoSuchName")).unwrap();

    assert_eq!(outcome, EffectOutcome::Unrecognized);
    assert_eq!(rig.probe.frame_count(), 0);
    assert_eq!(engine.state().power, None);
}

// ── Host requests ─────────────────────────────────────────────

#[test]
fn turn_on_applies_request_in_order() {
    let rig = Rig::new();
    let engine = rig.engine();
    let request = LightRequest::default()
        .with_brightness(200)
        .with_rgb(0, 0, 255)
        .with_effect("Xmas");

    drive(&engine, &rig.inbox, engine.turn_on(&request)).unwrap();

    let frames = rig.probe.frames();
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0], POWER_ON.to_vec());
    // Brightness 200/255 -> 78 % white.
    assert_eq!(&frames[1][3..10], &[0x01, 0x00, 0x00, 0x00, 0x00, 0x03, 0x0C]);
    // Blue at full value.
    assert_eq!(&frames[2][3..10], &[0x01, 0x00, 0xF0, 0x03, 0xE8, 0x03, 0xE8]);
    // Xmas preset at the last known brightness.
    assert_eq!(&frames[3][3..7], &[0x02, 18, 0x03, 0xE8]);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.effect, Some("Xmas"));
    assert_eq!(snapshot.brightness_255, Some(255));
}

#[test]
fn turn_on_with_empty_request_only_powers() {
    let rig = Rig::new();
    let engine = rig.engine();

    drive(&engine, &rig.inbox, engine.turn_on(&LightRequest::default())).unwrap();

    assert_eq!(rig.probe.frames(), vec![POWER_ON.to_vec()]);
}
