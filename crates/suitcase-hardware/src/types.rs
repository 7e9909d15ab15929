//! Common types shared across hardware device implementations.
//!
//! Device metadata, LED colors and commands, and the fixed set of audio cues.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use suitcase_core::Team;

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "ACR1252", "Mock Keypad").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// One of the two status LEDs next to the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Red,
    Blue,
}

impl From<Team> for Indicator {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => Indicator::Red,
            Team::Blue => Indicator::Blue,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

/// Colors for the addressable LED strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LedColor {
    /// LED off.
    Off,

    /// Red LED.
    Red,

    /// Green LED.
    Green,

    /// Blue LED.
    Blue,

    /// White LED.
    White,

    /// Custom RGB color (red, green, blue).
    Custom(u8, u8, u8),
}

impl LedColor {
    /// Create a custom RGB LED color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Custom(r, g, b)
    }

    /// Get the RGB components of the LED color.
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Off => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::White => (255, 255, 255),
            Self::Custom(r, g, b) => (*r, *g, *b),
        }
    }
}

impl From<Team> for LedColor {
    fn from(team: Team) -> Self {
        match team {
            Team::Red => LedColor::Red,
            Team::Blue => LedColor::Blue,
        }
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.as_rgb();
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

/// A single LED instruction.
///
/// Game logic emits these as data; an [`LedSignaler`](crate::traits::LedSignaler)
/// executes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedCommand {
    /// Switch an indicator solid on or off.
    SetIndicator { indicator: Indicator, on: bool },

    /// Fill the whole strip with one color.
    FillStrip(LedColor),

    /// Start blinking an indicator.
    StartBlink {
        indicator: Indicator,
        period: Duration,
    },

    /// Change the period of a running blink.
    SetBlinkPeriod {
        indicator: Indicator,
        period: Duration,
    },

    /// Stop blinking an indicator and leave it off.
    StopBlink(Indicator),

    /// Start pulsing the strip in one color.
    StartPulse { color: LedColor, period: Duration },

    /// Change the period of the running strip pulse.
    SetPulsePeriod(Duration),

    /// Stop the strip pulse and leave the strip dark.
    StopPulse,
}

/// Named audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Arm,
    Defuse,
    Boom,
    Beep,
}

impl AudioCue {
    /// Asset file name, or `None` for cues synthesized without a file.
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            Self::Arm => Some("arm.mp3"),
            Self::Defuse => Some("defuse.mp3"),
            Self::Boom => Some("boom.mp3"),
            Self::Beep => None,
        }
    }
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arm => write!(f, "Arm"),
            Self::Defuse => write!(f, "Defuse"),
            Self::Boom => write!(f, "Boom"),
            Self::Beep => write!(f, "Beep"),
        }
    }
}
