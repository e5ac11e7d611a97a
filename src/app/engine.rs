//! Protocol engine — the hexagonal core.
//!
//! [`ProtocolEngine`] owns the device state and the ACK tracker and exposes
//! the control surface (power, colour, brightness, preset, effect). All I/O
//! flows through port traits, making the whole engine testable with mock
//! adapters.
//!
//! ```text
//!        Link ◀── ┌────────────────────────────┐ ──▶ ChangeSink
//!                 │       ProtocolEngine       │
//!  notifications ─▶│ DeviceState · AckTracker  │ ◀── Clock
//!                 └────────────────────────────┘
//! ```
//!
//! ## Command pipeline
//!
//! Every command runs under the link lock, so callers queue rather than
//! interleave: the protocol has no command ids, and the next 4-byte
//! notification is taken as the ACK for whatever is in flight.
//!
//! 1. **Power step** — colour and preset commands first switch the device
//!    on if it is not known to be on, then wait the settle delay.
//! 2. **Transact** — encode, connect on demand, arm the tracker, write,
//!    wait for the ACK (bounded, no retry).
//! 3. **Commit** — apply the expected state optimistically and notify the
//!    sink. A later status notification overwrites it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{Result, TransportError};
use crate::protocol::ack::{AckTracker, wait_for_ack};
use crate::protocol::channels::NotificationInbox;
use crate::protocol::codec::{NotificationEvent, decode_notification};
use crate::protocol::command::Command;
use crate::protocol::effects::{EffectCatalog, PRESET_MAX, PRESET_MIN};
use crate::protocol::link::Link;

use super::color::{Hsv, PERCENT_MAX, Rgb, percent_from_255};
use super::commands::LightRequest;
use super::events::ChangeEvent;
use super::ports::{ChangeSink, Clock};
use super::state::{DeviceState, StateSnapshot};

/// Result of [`ProtocolEngine::set_effect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect's preset was commanded.
    Applied(u8),
    /// The name is not in the catalog; nothing was sent.
    Unrecognized,
}

/// State touched by both the command path and the notification path.
struct Shared {
    state: DeviceState,
    ack: AckTracker,
}

type SharedCell = BlockingMutex<CriticalSectionRawMutex, RefCell<Shared>>;

/// Disarms the tracker when a transaction ends for any reason, including
/// the caller dropping the command future mid-wait.
struct DisarmOnDrop<'a>(&'a SharedCell);

impl Drop for DisarmOnDrop<'_> {
    fn drop(&mut self) {
        self.0.lock(|cell| cell.borrow_mut().ack.cancel());
    }
}

// ───────────────────────────────────────────────────────────────
// ProtocolEngine
// ───────────────────────────────────────────────────────────────

/// Drives one Hello Fairy controller over one link.
pub struct ProtocolEngine<L, C, S> {
    config: EngineConfig,
    effects: EffectCatalog,
    /// Held for the whole "send + await ACK" sequence of a command.
    link: Mutex<CriticalSectionRawMutex, L>,
    shared: SharedCell,
    clock: C,
    sink: S,
}

impl<L: Link, C: Clock, S: ChangeSink> ProtocolEngine<L, C, S> {
    /// Construct the engine. An invalid configuration is replaced by the
    /// defaults.
    pub fn new(config: EngineConfig, link: L, clock: C, sink: S) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!("Engine config rejected ({}), using defaults", e);
                EngineConfig::default()
            }
        };

        Self {
            config,
            effects: EffectCatalog::new(),
            link: Mutex::new(link),
            shared: BlockingMutex::new(RefCell::new(Shared {
                state: DeviceState::default(),
                ack: AckTracker::new(),
            })),
            clock,
            sink,
        }
    }

    // ── Session ───────────────────────────────────────────────

    /// Connect now instead of on the first command.
    pub async fn connect(&self) -> Result<()> {
        let mut link = self.link.lock().await;
        self.ensure_connected(&mut link).await
    }

    /// Tear the session down. Any in-flight expectation is dropped.
    pub async fn disconnect(&self) {
        let mut link = self.link.lock().await;
        link.disconnect().await;
        self.with_shared(|s| s.ack.cancel());
        info!("Disconnected");
    }

    // ── Control surface ───────────────────────────────────────

    /// Switch the lights on or off. A no-op when the state already matches.
    pub async fn set_power(&self, on: bool) -> Result<()> {
        let mut link = self.link.lock().await;
        self.power_step(&mut link, on).await
    }

    /// Show a solid colour. Components are clamped to 0–359 / 0–100 / 0–100.
    pub async fn set_color_hsv(&self, h: u16, s: u8, v: u8) -> Result<()> {
        let mut link = self.link.lock().await;
        self.color_step(&mut link, h, s, v).await
    }

    /// Show a solid RGB colour.
    ///
    /// Pure black would command zero brightness; the last known brightness
    /// (or the configured default) is used instead.
    pub async fn set_color_rgb(&self, r: u8, g: u8, b: u8) -> Result<()> {
        let mut link = self.link.lock().await;
        let mut hsv = Rgb { r, g, b }.to_hsv();
        if hsv.v == 0 {
            hsv.v = self.fallback_brightness();
            debug!("Black requested, keeping brightness at {}%", hsv.v);
        }
        self.color_step(&mut link, hsv.h, hsv.s, hsv.v).await
    }

    /// Change brightness (0–100 %) keeping the current hue and saturation.
    /// Without a known colour the light turns white. Ignored while off.
    pub async fn set_brightness(&self, level: u8) -> Result<()> {
        let mut link = self.link.lock().await;
        let state = self.state();
        if !state.is_on() {
            debug!("Brightness {}% ignored while off", level);
            return Ok(());
        }
        let level = level.min(PERCENT_MAX);
        let (h, s) = state.hsv.map_or((0, 0), |c| (c.h, c.s));
        self.color_step(&mut link, h, s, level).await
    }

    /// Run a preset effect by number (clamped to 1–58).
    pub async fn set_preset(&self, preset: u8) -> Result<()> {
        let mut link = self.link.lock().await;
        self.preset_step(&mut link, preset).await
    }

    /// Run a named effect from the catalog. Unknown names are reported, not
    /// treated as errors.
    pub async fn set_effect(&self, name: &str) -> Result<EffectOutcome> {
        let Some(preset) = self.effects.lookup(name) else {
            warn!("Unknown effect: {}", name);
            return Ok(EffectOutcome::Unrecognized);
        };
        self.set_preset(preset).await?;
        Ok(EffectOutcome::Applied(preset))
    }

    /// Host "turn on": power, then brightness, colour and effect in that
    /// order, each as its own serialized operation.
    pub async fn turn_on(&self, request: &LightRequest) -> Result<()> {
        self.set_power(true).await?;
        if let Some(level) = request.brightness {
            self.set_brightness(percent_from_255(level)).await?;
        }
        if let Some(rgb) = request.rgb {
            self.set_color_rgb(rgb.r, rgb.g, rgb.b).await?;
        }
        if let Some(name) = &request.effect {
            self.set_effect(name).await?;
        }
        Ok(())
    }

    pub async fn turn_off(&self) -> Result<()> {
        self.set_power(false).await
    }

    // ── Notifications ─────────────────────────────────────────

    /// Interpret one notification from the link. Never fails: frames that
    /// are not understood are dropped.
    pub fn handle_notification(&self, data: &[u8]) {
        debug!("RX {:02x?}", data);

        let change = self.with_shared(|s| match decode_notification(data) {
            NotificationEvent::Ack => {
                if !s.ack.resolve() {
                    debug!("Stray ACK with no command in flight");
                }
                Some(ChangeEvent::Acknowledged(s.state))
            }
            NotificationEvent::StatusOff => {
                s.state.apply_power_off();
                Some(ChangeEvent::Reported(s.state))
            }
            NotificationEvent::StatusColor { h, s: sat, v } => {
                s.state.apply_status_color(Hsv { h, s: sat, v });
                Some(ChangeEvent::Reported(s.state))
            }
            NotificationEvent::StatusPreset { preset, brightness } => {
                s.state.apply_status_preset(preset, brightness);
                Some(ChangeEvent::Reported(s.state))
            }
            NotificationEvent::Unrecognized => None,
        });

        let Some(change) = change else {
            debug!("Dropping unrecognized {}-byte notification", data.len());
            return;
        };

        if let ChangeEvent::Reported(state) = &change {
            debug!("Status: {:?}", state);
        }
        self.sink.emit(&change);
    }

    /// Drain `inbox` forever, dispatching each notification.
    pub async fn run_notifications(&self, inbox: &NotificationInbox) {
        loop {
            let notification = inbox.receive().await;
            self.handle_notification(&notification);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Copy of the last-known device state.
    pub fn state(&self) -> DeviceState {
        self.with_shared(|s| s.state)
    }

    /// State plus the host-facing derived fields.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(self.state(), &self.effects)
    }

    /// Name of the running effect, if the active preset has one.
    pub fn current_effect(&self) -> Option<&'static str> {
        self.snapshot().effect
    }

    pub fn effects(&self) -> &EffectCatalog {
        &self.effects
    }

    /// Whether a command is currently awaiting its ACK.
    pub fn ack_pending(&self) -> bool {
        self.with_shared(|s| s.ack.is_pending())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consume the engine and hand back its link.
    pub fn into_link(self) -> L {
        self.link.into_inner()
    }

    // ── Pipeline steps (link lock held) ───────────────────────

    async fn power_step(&self, link: &mut L, on: bool) -> Result<()> {
        if self.state().power == Some(on) {
            debug!("Power already {}", if on { "on" } else { "off" });
            return Ok(());
        }
        self.transact(link, Command::PowerSet(on)).await?;
        self.commit(|state| state.apply_optimistic_power(on));
        Ok(())
    }

    /// The controller ignores colour/preset commands sent right after
    /// power-on, hence the settle delay.
    async fn ensure_powered(&self, link: &mut L) -> Result<()> {
        if self.state().is_on() {
            return Ok(());
        }
        self.power_step(link, true).await?;
        self.clock.sleep(self.config.settle_delay()).await;
        Ok(())
    }

    async fn color_step(&self, link: &mut L, h: u16, s: u8, v: u8) -> Result<()> {
        self.ensure_powered(link).await?;
        let hsv = Hsv::clamped(h, s, v);
        self.transact(link, Command::ColorSet(hsv)).await?;
        self.commit(|state| state.apply_optimistic_color(hsv));
        Ok(())
    }

    async fn preset_step(&self, link: &mut L, preset: u8) -> Result<()> {
        self.ensure_powered(link).await?;
        let preset = preset.clamp(PRESET_MIN, PRESET_MAX);
        let brightness = self.fallback_brightness();
        self.transact(link, Command::PresetSet { preset, brightness }).await?;
        self.commit(|state| state.apply_optimistic_preset(preset, brightness));
        Ok(())
    }

    async fn ensure_connected(&self, link: &mut L) -> Result<()> {
        if link.is_connected() {
            return Ok(());
        }
        info!("Link down, connecting");
        link.connect().await.map_err(|e| {
            warn!("Connect failed: {}", e);
            TransportError::ConnectFailed
        })?;
        info!("Connected");
        Ok(())
    }

    /// Send one command and wait for its ACK. At most once: no retries.
    async fn transact(&self, link: &mut L, command: Command) -> Result<()> {
        let frame = command.encode()?;
        self.ensure_connected(link).await?;

        // Armed before the write so an ACK racing the write completion is
        // not lost.
        let deadline = self.clock.now() + self.config.ack_timeout();
        self.with_shared(|s| s.ack.arm(deadline))?;
        let _armed = DisarmOnDrop(&self.shared);

        debug!("TX {:02x?}", frame.as_bytes());
        if let Err(e) = link.write(frame.as_bytes()).await {
            warn!("Write of {:?} failed: {}", command, e);
            return Err(TransportError::WriteFailed.into());
        }

        let result = wait_for_ack(&self.clock, self.config.ack_poll_interval(), deadline, |now| {
            self.with_shared(|s| s.ack.poll(now))
        })
        .await;

        if result.is_err() {
            warn!(
                "No ACK for {:?} after {} ms, abandoning",
                command, self.config.ack_timeout_ms
            );
        }
        result
    }

    // ── Internal ──────────────────────────────────────────────

    fn with_shared<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        self.shared.lock(|cell| f(&mut cell.borrow_mut()))
    }

    fn commit(&self, apply: impl FnOnce(&mut DeviceState)) {
        let state = self.with_shared(|s| {
            apply(&mut s.state);
            s.state
        });
        self.sink.emit(&ChangeEvent::Applied(state));
    }

    fn fallback_brightness(&self) -> u8 {
        self.state()
            .known_brightness()
            .unwrap_or(self.config.default_brightness)
    }
}
