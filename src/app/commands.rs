//! Inbound requests from a host light entity.
//!
//! A host "turn on" call can carry brightness, colour and effect at once.
//! [`ProtocolEngine::turn_on`](super::engine::ProtocolEngine::turn_on)
//! interprets a [`LightRequest`] as a fixed sequence of engine operations.

use super::color::Rgb;

/// Everything a host may ask for when turning the light on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightRequest {
    /// Brightness on the host's 0–255 scale.
    pub brightness: Option<u8>,
    pub rgb: Option<Rgb>,
    /// Effect name from the catalog.
    pub effect: Option<String>,
}

impl LightRequest {
    pub fn with_brightness(mut self, level: u8) -> Self {
        self.brightness = Some(level);
        self
    }

    pub fn with_rgb(mut self, r: u8, g: u8, b: u8) -> Self {
        self.rgb = Some(Rgb { r, g, b });
        self
    }

    pub fn with_effect(mut self, name: impl Into<String>) -> Self {
        self.effect = Some(name.into());
        self
    }
}
