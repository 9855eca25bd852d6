//! HSBK color — the tuple smart bulbs report and accept.

use serde::{Deserialize, Serialize};

/// Hue, saturation, brightness, and color temperature of a bulb.
///
/// All channels are raw 16-bit device values; kelvin is the color
/// temperature for whites. The controller never interprets these beyond
/// equality — it caches what the bulb reports and replays what scenes store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsbk {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

impl Hsbk {
    /// Build a color from its four channels.
    #[must_use]
    pub fn new(hue: u16, saturation: u16, brightness: u16, kelvin: u16) -> Self {
        Self {
            hue,
            saturation,
            brightness,
            kelvin,
        }
    }
}

impl std::fmt::Display for Hsbk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hue={} sat={} bri={} kelvin={}",
            self.hue, self.saturation, self.brightness, self.kelvin
        )
    }
}
