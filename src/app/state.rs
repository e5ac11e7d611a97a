//! Last-known device state.
//!
//! [`DeviceState`] is written from two directions: optimistic updates after
//! a command is acknowledged, and authoritative status notifications pushed
//! by the controller. Both go through the same mutation methods and the
//! last write wins; the device is the source of truth, so a notification
//! always overwrites an optimistic guess.
//!
//! Invariant: when `mode` is set, exactly one of {`hsv` + `rgb`, `preset`}
//! is populated. When the device is off or unobserved, neither is.

use serde::Serialize;

use super::color::{Hsv, PERCENT_MAX, percent_to_255};
use crate::protocol::effects::{EffectCatalog, PRESET_MAX, PRESET_MIN};

/// What the controller is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// A solid HSV colour.
    Color,
    /// One of the built-in preset effects.
    Preset,
}

/// Snapshot of everything known about the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DeviceState {
    /// `None` before the first observation.
    pub power: Option<bool>,
    pub mode: Option<Mode>,
    pub hsv: Option<Hsv>,
    /// Derived from `hsv`.
    pub rgb: Option<super::color::Rgb>,
    pub preset: Option<u8>,
    /// 0–100 %, from `hsv.v` or the preset brightness.
    pub brightness: Option<u8>,
}

impl DeviceState {
    pub fn is_on(&self) -> bool {
        self.power == Some(true)
    }

    /// Last brightness worth reusing. Zero counts as unknown so that a
    /// follow-up command never silently turns the lights dark.
    pub fn known_brightness(&self) -> Option<u8> {
        self.brightness.filter(|b| *b > 0)
    }

    // ── Notification-driven ──────────────────────────────────

    pub fn apply_power_off(&mut self) {
        *self = Self {
            power: Some(false),
            ..Self::default()
        };
    }

    pub fn apply_status_color(&mut self, hsv: Hsv) {
        let hsv = Hsv::clamped(hsv.h, hsv.s, hsv.v);
        self.power = Some(true);
        self.mode = Some(Mode::Color);
        self.hsv = Some(hsv);
        self.rgb = Some(hsv.to_rgb());
        self.preset = None;
        self.brightness = Some(hsv.v);
    }

    pub fn apply_status_preset(&mut self, preset: u8, brightness: u8) {
        self.power = Some(true);
        self.mode = Some(Mode::Preset);
        self.preset = Some(preset.clamp(PRESET_MIN, PRESET_MAX));
        self.brightness = Some(brightness.min(PERCENT_MAX));
        self.hsv = None;
        self.rgb = None;
    }

    // ── Command-driven (after the ACK) ───────────────────────

    pub fn apply_optimistic_power(&mut self, on: bool) {
        if on {
            self.power = Some(true);
        } else {
            self.apply_power_off();
        }
    }

    pub fn apply_optimistic_color(&mut self, hsv: Hsv) {
        self.apply_status_color(hsv);
    }

    pub fn apply_optimistic_preset(&mut self, preset: u8, brightness: u8) {
        self.apply_status_preset(preset, brightness);
    }
}

/// Device state plus the fields a host light entity presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub state: DeviceState,
    /// Effect name when the active preset has one.
    pub effect: Option<&'static str>,
    /// Brightness on the host's 0–255 scale.
    pub brightness_255: Option<u8>,
}

impl StateSnapshot {
    pub fn new(state: DeviceState, effects: &EffectCatalog) -> Self {
        let effect = match (state.mode, state.preset) {
            (Some(Mode::Preset), Some(preset)) => effects.name_for(preset),
            _ => None,
        };
        Self {
            state,
            effect,
            brightness_255: state.brightness.map(percent_to_255),
        }
    }
}
