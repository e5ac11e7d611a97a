//! End-to-end tests against the in-process controller emulator: frames
//! are validated and applied by the emulated device, and its ACKs and
//! status reports flow back through the inbox.

use hello_fairy::ProtocolEngine;
use hello_fairy::adapters::sim_link::{SimMode, SimOptions, SimulatedDevice};
use hello_fairy::app::color::Hsv;
use hello_fairy::app::commands::LightRequest;
use hello_fairy::app::state::Mode;
use hello_fairy::config::EngineConfig;
use hello_fairy::error::{Error, TransportError};
use hello_fairy::protocol::channels::NotificationInbox;

use super::mock_link::{MockClock, RecordingSink, drive};

#[test]
fn session_reaches_the_emulated_controller() {
    let inbox = NotificationInbox::new();
    let clock = MockClock::new();
    let sink = RecordingSink::new();
    let engine = ProtocolEngine::new(
        EngineConfig::default(),
        SimulatedDevice::new(&inbox),
        &clock,
        &sink,
    );

    let request = LightRequest::default().with_rgb(255, 0, 0);
    drive(&engine, &inbox, engine.turn_on(&request)).unwrap();
    assert_eq!(engine.state().hsv, Some(Hsv { h: 0, s: 100, v: 100 }));

    drive(&engine, &inbox, engine.set_effect("Halloween")).unwrap();
    assert_eq!(engine.state().mode, Some(Mode::Preset));
    assert_eq!(engine.current_effect(), Some("Halloween"));

    let device = engine.into_link();
    assert_eq!(device.writes().len(), 3);
    assert!(device.controller().power);
    assert_eq!(
        device.controller().mode,
        SimMode::Preset { id: 20, brightness: 1000 }
    );
}

#[test]
fn silent_device_times_out() {
    let inbox = NotificationInbox::new();
    let clock = MockClock::new();
    let engine = ProtocolEngine::new(
        EngineConfig::default(),
        SimulatedDevice::with_options(
            &inbox,
            SimOptions {
                ack: false,
                report_status: false,
                ..SimOptions::default()
            },
        ),
        &clock,
        (),
    );

    let result = drive(&engine, &inbox, engine.set_power(true));

    assert_eq!(result, Err(Error::CommandTimeout));
    assert_eq!(clock.now_ms(), 5000);
    assert!(engine.into_link().controller().power, "device applied it anyway");
}

#[test]
fn refused_connection_surfaces_as_transport_error() {
    let inbox = NotificationInbox::new();
    let clock = MockClock::new();
    let engine = ProtocolEngine::new(
        EngineConfig::default(),
        SimulatedDevice::with_options(
            &inbox,
            SimOptions {
                fail_connect: true,
                ..SimOptions::default()
            },
        ),
        &clock,
        (),
    );

    assert_eq!(
        drive(&engine, &inbox, engine.set_power(true)),
        Err(Error::Transport(TransportError::ConnectFailed))
    );
}

#[test]
fn status_reports_keep_state_in_step_with_device() {
    let inbox = NotificationInbox::new();
    let clock = MockClock::new();
    let sink = RecordingSink::new();
    let engine = ProtocolEngine::new(
        EngineConfig::default(),
        SimulatedDevice::new(&inbox),
        &clock,
        &sink,
    );

    drive(&engine, &inbox, engine.set_color_hsv(300, 40, 70)).unwrap();
    drive(&engine, &inbox, engine.turn_off()).unwrap();
    // Let the trailing status report drain.
    drive(&engine, &inbox, futures_lite::future::yield_now());

    let state = engine.state();
    assert_eq!(state.power, Some(false));
    assert_eq!(state.hsv, None);
}
