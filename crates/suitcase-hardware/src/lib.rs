//! Hardware abstraction layer for the airsoft suitcase.
//!
//! The game controller talks to the prop through four device families:
//!
//! - [`LedSignaler`]: red and blue status LEDs plus an addressable strip
//!   with solid, blink and pulse effects.
//! - [`AudioSignaler`]: fire-and-forget cues (`Arm`, `Defuse`, `Boom`, `Beep`).
//! - [`KeypadDevice`]: 4×4 matrix keypad and two side buttons, reported as
//!   press/release transitions and mapped to game keys by [`KeyMap`].
//! - [`NfcReader`]: contactless reader used to unlock the bomb on Hard.
//!
//! # Outputs
//!
//! Output traits are synchronous. A driver starts an effect and returns; the
//! game never waits for hardware. Errors are returned so the caller can log
//! them.
//!
//! ```
//! use suitcase_hardware::mock::{IndicatorState, MockLed};
//! use suitcase_hardware::{Indicator, LedSignaler};
//! use std::time::Duration;
//!
//! let mut led = MockLed::new();
//! led.start_blink(Indicator::Red, Duration::from_millis(250)).unwrap();
//! assert_eq!(
//!     led.indicator(Indicator::Red),
//!     IndicatorState::Blinking(Duration::from_millis(250))
//! );
//! ```
//!
//! # Inputs
//!
//! Input traits are async and run inside device tasks owned by the
//! [`PeripheralManager`], which merges them into one stream of
//! [`InputEvent`](suitcase_core::InputEvent)s.
//!
//! ```no_run
//! use suitcase_hardware::devices::{AnyKeypadDevice, AnyNfcReader};
//! use suitcase_hardware::manager::{PeripheralConfig, PeripheralEvent, PeripheralManager};
//! use suitcase_hardware::mock::{MockKeypad, MockNfc};
//!
//! # async fn example() -> suitcase_hardware::Result<()> {
//! let mut manager = PeripheralManager::new(PeripheralConfig::default());
//! let (keypad, keys) = MockKeypad::new();
//! let (reader, cards) = MockNfc::new();
//! manager.register_keypad(AnyKeypadDevice::Mock(keypad));
//! manager.register_nfc(AnyNfcReader::Mock(reader));
//!
//! let mut handle = manager.start();
//! keys.type_symbols("1").await?;
//! if let Some(PeripheralEvent::Input(event)) = handle.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `hardware-pcsc`: PC/SC contactless reader (`AnyNfcReader::Pcsc`).

pub mod devices;
pub mod error;
pub mod keymap;
pub mod manager;
pub mod mock;
#[cfg(feature = "hardware-pcsc")]
pub mod pcsc_reader;
pub mod sim;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use keymap::KeyMap;
pub use traits::{
    AudioSignaler, CardData, KeyEdge, KeypadDevice, KeypadEvent, KeypadInput, LedSignaler,
    NfcReader,
};
pub use types::{AudioCue, DeviceInfo, Indicator, LedColor, LedCommand};

// Re-export manager types
pub use manager::{
    DeviceType, PeripheralConfig, PeripheralEvent, PeripheralHandle, PeripheralManager,
    PeripheralStats,
};
