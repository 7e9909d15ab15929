//! Mock keypad implementation for testing and the console harness.
//!
//! The keypad receives raw key transitions through an internal channel.
//! Tests and the console drive it with a [`MockKeypadHandle`].

use crate::{
    Result,
    traits::{KeypadDevice, KeypadEvent, KeypadInput},
    types::DeviceInfo,
};
use tokio::sync::mpsc;

/// Mock keypad device.
///
/// # Examples
///
/// ```
/// use suitcase_hardware::mock::MockKeypad;
/// use suitcase_hardware::traits::{KeypadDevice, KeypadEvent, KeypadInput};
///
/// #[tokio::main]
/// async fn main() -> suitcase_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     tokio::spawn(async move {
///         handle.tap(KeypadInput::BlueButton).await.unwrap();
///     });
///
///     assert_eq!(
///         keypad.read_event().await?,
///         KeypadEvent::pressed(KeypadInput::BlueButton)
///     );
///     assert_eq!(
///         keypad.read_event().await?,
///         KeypadEvent::released(KeypadInput::BlueButton)
///     );
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated transitions
    event_rx: mpsc::Receiver<KeypadEvent>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    ///
    /// Returns the keypad and a handle that feeds it.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (event_tx, event_rx) = mpsc::channel(64);

        let keypad = Self {
            event_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { event_tx, name };

        (keypad, handle)
    }
}

impl KeypadDevice for MockKeypad {
    async fn read_event(&mut self) -> Result<KeypadEvent> {
        self.event_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("Keypad input channel closed"))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Keypad v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for driving a mock keypad. It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated transitions
    event_tx: mpsc::Sender<KeypadEvent>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Send a raw transition to the keypad.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped and the channel is closed.
    pub async fn send_event(&self, event: KeypadEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Press a key and keep it down.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed.
    pub async fn press(&self, input: KeypadInput) -> Result<()> {
        self.send_event(KeypadEvent::pressed(input)).await
    }

    /// Release a held key.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed.
    pub async fn release(&self, input: KeypadInput) -> Result<()> {
        self.send_event(KeypadEvent::released(input)).await
    }

    /// Press and immediately release a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed.
    pub async fn tap(&self, input: KeypadInput) -> Result<()> {
        self.press(input).await?;
        self.release(input).await
    }

    /// Tap every character of `symbols` in order.
    ///
    /// # Errors
    ///
    /// Returns an error for characters that are not on the keypad or if the
    /// channel is closed.
    ///
    /// # Examples
    ///
    /// ```
    /// use suitcase_hardware::mock::MockKeypad;
    ///
    /// #[tokio::main]
    /// async fn main() -> suitcase_hardware::Result<()> {
    ///     let (_keypad, handle) = MockKeypad::new();
    ///     handle.type_symbols("12AB").await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn type_symbols(&self, symbols: &str) -> Result<()> {
        for c in symbols.chars() {
            self.tap(KeypadInput::from_char(c)?).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
