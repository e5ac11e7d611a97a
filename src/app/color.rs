//! Colour-space conversions.
//!
//! The controller speaks HSV (hue in whole degrees, saturation and value in
//! whole percent). Hosts usually think in RGB, so both directions live here.
//! `palette` does the conversion in `f32`; this module only maps its results
//! to the nearest representable integer.

use palette::{FromColor, Srgb};
use serde::{Deserialize, Serialize};

/// Largest hue the controller accepts (degrees).
pub const HUE_MAX: u16 = 359;

/// Largest saturation/value/brightness (percent).
pub const PERCENT_MAX: u8 = 100;

/// Hue 0–359°, saturation 0–100 %, value 0–100 %.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u16,
    pub s: u8,
    pub v: u8,
}

/// Colour as 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Hsv {
    /// Build an HSV value with every component clamped into range.
    pub fn clamped(h: u16, s: u8, v: u8) -> Self {
        Self {
            h: h.min(HUE_MAX),
            s: s.min(PERCENT_MAX),
            v: v.min(PERCENT_MAX),
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let hsv: palette::Hsv = palette::Hsv::new(
            f32::from(self.h),
            f32::from(self.s) / 100.0,
            f32::from(self.v) / 100.0,
        );
        let rgb: Srgb = Srgb::from_color(hsv);
        let rgb: Srgb<u8> = rgb.into_format();
        Rgb {
            r: rgb.red,
            g: rgb.green,
            b: rgb.blue,
        }
    }
}

impl Rgb {
    /// Inverse of [`Hsv::to_rgb`]. Pure black yields `v == 0`; callers that
    /// must not command zero brightness substitute their own value.
    pub fn to_hsv(self) -> Hsv {
        let rgb: Srgb = Srgb::new(self.r, self.g, self.b).into_format();
        let hsv: palette::Hsv = palette::Hsv::from_color(rgb);
        Hsv {
            // 359.5° and up rounds to 360, which wraps to 0.
            h: (hsv.hue.into_positive_degrees().round() as u16) % 360,
            s: unit_to_percent(hsv.saturation),
            v: unit_to_percent(hsv.value),
        }
    }
}

fn unit_to_percent(x: f32) -> u8 {
    (x * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Brightness percent (0–100) to the 0–255 scale used by host light models.
pub fn percent_to_255(pct: u8) -> u8 {
    (u32::from(pct.min(PERCENT_MAX)) * 255 / 100) as u8
}

/// 0–255 brightness to percent (0–100).
pub fn percent_from_255(level: u8) -> u8 {
    (u32::from(level) * 100 / 255) as u8
}
