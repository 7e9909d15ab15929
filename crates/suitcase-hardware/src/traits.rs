//! Hardware device trait definitions.
//!
//! Two families of traits connect the game to the prop:
//!
//! - **Outputs** ([`LedSignaler`], [`AudioSignaler`]) are synchronous and
//!   fire-and-forget. Implementations start the effect (a blink thread, a
//!   player process) and return immediately; the controller never waits on
//!   them.
//! - **Inputs** ([`KeypadDevice`], [`NfcReader`]) use native `async fn`
//!   methods (Rust 1.90 + Edition 2024 RPITIT) and run inside device tasks
//!   spawned by the [`PeripheralManager`](crate::manager::PeripheralManager).

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{AudioCue, DeviceInfo, Indicator, LedColor, LedCommand};
use std::time::Duration;
use suitcase_core::KeypadSymbol;

/// A physical key on the prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadInput {
    /// Code symbol (`0-9`, `A-D`).
    Symbol(KeypadSymbol),

    /// Star key (*).
    Star,

    /// Hash/pound key (#).
    Hash,

    /// Red side button.
    RedButton,

    /// Blue side button.
    BlueButton,
}

impl KeypadInput {
    /// Parse a keypad matrix character (`0-9`, `A-D`, `*`, `#`).
    ///
    /// # Errors
    ///
    /// Returns an error for characters that are not on the keypad.
    ///
    /// # Examples
    ///
    /// ```
    /// use suitcase_hardware::traits::KeypadInput;
    ///
    /// assert_eq!(KeypadInput::from_char('#').unwrap(), KeypadInput::Hash);
    /// assert!(KeypadInput::from_char('x').is_err());
    /// ```
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '*' => Ok(Self::Star),
            '#' => Ok(Self::Hash),
            _ => KeypadSymbol::new(c)
                .map(Self::Symbol)
                .map_err(|e| crate::error::HardwareError::other(e.to_string())),
        }
    }
}

/// Whether a key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEdge {
    Pressed,
    Released,
}

/// A raw key transition reported by a keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeypadEvent {
    pub input: KeypadInput,
    pub edge: KeyEdge,
}

impl KeypadEvent {
    pub fn pressed(input: KeypadInput) -> Self {
        Self {
            input,
            edge: KeyEdge::Pressed,
        }
    }

    pub fn released(input: KeypadInput) -> Self {
        Self {
            input,
            edge: KeyEdge::Released,
        }
    }
}

/// Keypad device abstraction.
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generics, or the enum wrapper from the
/// [`devices`](crate::devices) module for dynamic dispatch:
///
/// ```no_run
/// use suitcase_hardware::devices::AnyKeypadDevice;
/// use suitcase_hardware::traits::KeypadDevice;
/// use suitcase_hardware::mock::MockKeypad;
///
/// # async fn example() -> suitcase_hardware::Result<()> {
/// let (keypad, _handle) = MockKeypad::new();
/// let mut any_keypad = AnyKeypadDevice::Mock(keypad);
///
/// let event = any_keypad.read_event().await?;
/// # Ok(())
/// # }
/// ```
pub trait KeypadDevice: Send + Sync {
    /// Wait for the next key transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    async fn read_event(&mut self) -> Result<KeypadEvent>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// A card seen by an NFC reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    /// Card UID; empty when the reader could not report one.
    pub uid: Vec<u8>,
}

impl CardData {
    pub fn new(uid: Vec<u8>) -> Self {
        Self { uid }
    }

    /// UID as colon-separated hex, or `unknown`.
    ///
    /// # Examples
    ///
    /// ```
    /// use suitcase_hardware::traits::CardData;
    ///
    /// assert_eq!(CardData::new(vec![0x04, 0xAB]).uid_hex(), "04:AB");
    /// assert_eq!(CardData::new(Vec::new()).uid_hex(), "unknown");
    /// ```
    pub fn uid_hex(&self) -> String {
        if self.uid.is_empty() {
            return "unknown".to_string();
        }
        self.uid
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// NFC reader abstraction.
///
/// The game only needs to know that *a* card was presented; the UID is
/// logged but never checked.
pub trait NfcReader: Send + Sync {
    /// Wait until a card is presented.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is disconnected.
    async fn wait_for_card(&mut self) -> Result<CardData>;

    /// Whether a reader was found at startup.
    fn is_available(&self) -> bool;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Status LEDs and the addressable strip.
///
/// Blink and pulse run in the driver's own time base; the controller only
/// starts, retunes and stops them.
pub trait LedSignaler: Send {
    /// Switch an indicator solid on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the LED cannot be driven.
    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<()>;

    /// Fill the strip with one color.
    ///
    /// # Errors
    ///
    /// Returns an error if the strip cannot be driven.
    fn fill_strip(&mut self, color: LedColor) -> Result<()>;

    /// Start blinking an indicator with the given full period.
    ///
    /// # Errors
    ///
    /// Returns an error if the LED cannot be driven.
    fn start_blink(&mut self, indicator: Indicator, period: Duration) -> Result<()>;

    /// Retune a running blink.
    ///
    /// # Errors
    ///
    /// Returns an error if the LED cannot be driven.
    fn set_blink_period(&mut self, indicator: Indicator, period: Duration) -> Result<()>;

    /// Stop blinking; the indicator is left off.
    ///
    /// # Errors
    ///
    /// Returns an error if the LED cannot be driven.
    fn stop_blink(&mut self, indicator: Indicator) -> Result<()>;

    /// Start pulsing the strip in one color.
    ///
    /// # Errors
    ///
    /// Returns an error if the strip cannot be driven.
    fn start_pulse(&mut self, color: LedColor, period: Duration) -> Result<()>;

    /// Retune the running strip pulse.
    ///
    /// # Errors
    ///
    /// Returns an error if the strip cannot be driven.
    fn set_pulse_period(&mut self, period: Duration) -> Result<()>;

    /// Stop the strip pulse; the strip is left dark.
    ///
    /// # Errors
    ///
    /// Returns an error if the strip cannot be driven.
    fn stop_pulse(&mut self) -> Result<()>;

    /// Execute one [`LedCommand`].
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    fn execute(&mut self, command: LedCommand) -> Result<()> {
        match command {
            LedCommand::SetIndicator { indicator, on } => self.set_indicator(indicator, on),
            LedCommand::FillStrip(color) => self.fill_strip(color),
            LedCommand::StartBlink { indicator, period } => self.start_blink(indicator, period),
            LedCommand::SetBlinkPeriod { indicator, period } => {
                self.set_blink_period(indicator, period)
            }
            LedCommand::StopBlink(indicator) => self.stop_blink(indicator),
            LedCommand::StartPulse { color, period } => self.start_pulse(color, period),
            LedCommand::SetPulsePeriod(period) => self.set_pulse_period(period),
            LedCommand::StopPulse => self.stop_pulse(),
        }
    }
}

/// Audio output.
pub trait AudioSignaler: Send {
    /// Start playing a cue without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot be started.
    fn play(&mut self, cue: AudioCue) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_input_from_char() {
        assert_eq!(KeypadInput::from_char('*').unwrap(), KeypadInput::Star);
        assert_eq!(
            KeypadInput::from_char('b').unwrap(),
            KeypadInput::Symbol(KeypadSymbol::new('B').unwrap())
        );
        assert!(KeypadInput::from_char('E').is_err());
    }

    #[test]
    fn test_keypad_event_constructors() {
        let event = KeypadEvent::pressed(KeypadInput::Hash);
        assert_eq!(event.edge, KeyEdge::Pressed);
        assert_eq!(KeypadEvent::released(KeypadInput::Hash).edge, KeyEdge::Released);
    }

    #[test]
    fn test_card_uid_hex() {
        let card = CardData::new(vec![0x04, 0xAB, 0xCD, 0xEF]);
        assert_eq!(card.uid_hex(), "04:AB:CD:EF");
    }
}
