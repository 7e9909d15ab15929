//! Enum wrappers for input device dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn KeypadDevice>` is not available. The enums below give the
//! [`PeripheralManager`](crate::manager::PeripheralManager) concrete types to
//! hold while real drivers stay behind feature flags.
//!
//! # Examples
//!
//! ```
//! use suitcase_hardware::devices::AnyKeypadDevice;
//! use suitcase_hardware::mock::MockKeypad;
//!
//! let (keypad, _handle) = MockKeypad::new();
//! let any_keypad = AnyKeypadDevice::Mock(keypad);
//! ```

use crate::mock::{MockKeypad, MockNfc};
use crate::traits::{CardData, KeypadDevice, KeypadEvent, NfcReader};
use crate::{DeviceInfo, Result};

/// Enum wrapper for keypad device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeypadDevice {
    /// Channel-fed keypad for tests and the console harness.
    Mock(MockKeypad),
}

impl KeypadDevice for AnyKeypadDevice {
    async fn read_event(&mut self) -> Result<KeypadEvent> {
        match self {
            Self::Mock(device) => device.read_event().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for NFC reader dispatch.
///
/// # Examples
///
/// ```
/// use suitcase_hardware::devices::AnyNfcReader;
/// use suitcase_hardware::traits::NfcReader;
/// use suitcase_hardware::mock::MockNfc;
///
/// let (reader, _handle) = MockNfc::unavailable();
/// let any_reader = AnyNfcReader::Mock(reader);
/// assert!(!any_reader.is_available());
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyNfcReader {
    /// Channel-fed reader for tests and the console harness.
    Mock(MockNfc),

    /// PC/SC contactless reader.
    #[cfg(feature = "hardware-pcsc")]
    Pcsc(crate::pcsc_reader::PcscReader),
}

impl NfcReader for AnyNfcReader {
    async fn wait_for_card(&mut self) -> Result<CardData> {
        match self {
            Self::Mock(device) => device.wait_for_card().await,
            #[cfg(feature = "hardware-pcsc")]
            Self::Pcsc(device) => device.wait_for_card().await,
        }
    }

    fn is_available(&self) -> bool {
        match self {
            Self::Mock(device) => device.is_available(),
            #[cfg(feature = "hardware-pcsc")]
            Self::Pcsc(device) => device.is_available(),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            #[cfg(feature = "hardware-pcsc")]
            Self::Pcsc(device) => device.get_info().await,
        }
    }
}
