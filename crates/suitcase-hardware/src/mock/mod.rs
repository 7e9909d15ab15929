//! Mock device implementations for testing and development.
//!
//! Inputs are fed through handles over channels; outputs record what they
//! were asked to do.

pub mod audio;
pub mod keypad;
pub mod led;
pub mod nfc;

// Re-export commonly used types
pub use audio::MockAudio;
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use led::{IndicatorState, MockLed, StripState};
pub use nfc::{MockNfc, MockNfcHandle};
