//! Peripheral device manager.
//!
//! The `PeripheralManager` runs every input device in its own task and merges
//! what they report into one stream of game [`InputEvent`]s.
//!
//! ```text
//! ┌──────────┐  KeypadEvent  ┌────────┐
//! │ Keypad   │──────────────►│ KeyMap │──┐
//! │ Task     │               └────────┘  │   ┌─────────────────┐
//! └──────────┘                           ├──►│  Event Channel  │──► Game runtime
//! ┌──────────┐  CardPresented            │   │  (mpsc)         │
//! │ NFC      │───────────────────────────┘   └─────────────────┘
//! │ Task     │
//! └──────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use suitcase_hardware::manager::{PeripheralManager, PeripheralConfig};
//! use suitcase_hardware::devices::AnyKeypadDevice;
//! use suitcase_hardware::mock::MockKeypad;
//!
//! #[tokio::main]
//! async fn main() -> suitcase_hardware::Result<()> {
//!     let mut manager = PeripheralManager::new(PeripheralConfig::default());
//!
//!     let (keypad, _handle) = MockKeypad::new();
//!     manager.register_keypad(AnyKeypadDevice::Mock(keypad));
//!
//!     let mut handle = manager.start();
//!     while let Some(event) = handle.recv().await {
//!         println!("Event: {:?}", event);
//!     }
//!
//!     handle.shutdown().await?;
//!     Ok(())
//! }
//! ```

use crate::Result;
use crate::devices::{AnyKeypadDevice, AnyNfcReader};
use crate::keymap::KeyMap;
use crate::traits::{KeypadDevice, NfcReader};
use suitcase_core::InputEvent;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Unified event from any peripheral device.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PeripheralEvent {
    /// Game input produced by a device.
    Input(InputEvent),

    /// Device error occurred.
    ///
    /// The device task terminates after sending this event.
    DeviceError {
        /// Type of device that encountered the error.
        device_type: DeviceType,

        /// Error message.
        error: String,
    },
}

/// Type of peripheral device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Keypad,
    Nfc,
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keypad => write!(f, "Keypad"),
            Self::Nfc => write!(f, "NFC"),
        }
    }
}

/// Which devices the manager starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralConfig {
    pub keypad_enabled: bool,
    pub nfc_enabled: bool,

    /// Emit `dev-skip` on star presses.
    pub dev_skip: bool,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            keypad_enabled: true,
            nfc_enabled: true,
            dev_skip: false,
        }
    }
}

/// Statistics about registered peripherals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralStats {
    pub keypad_connected: bool,
    pub nfc_connected: bool,

    /// A reader is registered and found its hardware.
    pub nfc_available: bool,
}

/// Handle for receiving events from running device tasks.
pub struct PeripheralHandle {
    /// Event receiver for consuming events from devices.
    event_rx: mpsc::Receiver<PeripheralEvent>,

    /// Running device tasks.
    tasks: JoinSet<Result<()>>,
}

impl PeripheralHandle {
    /// Receive the next event from any peripheral device.
    ///
    /// Returns `None` when all device tasks have terminated.
    pub async fn recv(&mut self) -> Option<PeripheralEvent> {
        self.event_rx.recv().await
    }

    /// Abort all device tasks and wait for them to terminate.
    ///
    /// Task failures are logged, never returned.
    pub async fn shutdown(mut self) -> Result<()> {
        self.tasks.abort_all();

        let mut error_count = 0;
        let mut panic_count = 0;

        while let Some(result) = self.tasks.join_next().await {
            match Self::classify_task_result(result) {
                TaskTermination::Success | TaskTermination::Cancelled => {}
                TaskTermination::Error => error_count += 1,
                TaskTermination::Panic => panic_count += 1,
            }
        }

        if error_count + panic_count > 0 {
            warn!(error_count, panic_count, "device tasks ended abnormally");
        }
        debug!("peripherals shut down");
        Ok(())
    }

    fn classify_task_result(
        result: std::result::Result<Result<()>, tokio::task::JoinError>,
    ) -> TaskTermination {
        match result {
            Ok(Ok(())) => TaskTermination::Success,
            Ok(Err(_)) => TaskTermination::Error,
            Err(e) if e.is_cancelled() => TaskTermination::Cancelled,
            Err(_) => TaskTermination::Panic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskTermination {
    Success,
    Error,
    Cancelled,
    Panic,
}

/// Manages all input peripherals.
///
/// # Lifecycle
///
/// 1. Create manager with configuration
/// 2. Register devices using `register_*` methods
/// 3. Call `start()` to spawn device tasks and get the event handle
/// 4. Device tasks run until error or the handle is dropped
pub struct PeripheralManager {
    keypad: Option<AnyKeypadDevice>,
    nfc: Option<AnyNfcReader>,
    event_tx: mpsc::Sender<PeripheralEvent>,
    event_rx: mpsc::Receiver<PeripheralEvent>,
    config: PeripheralConfig,
}

impl PeripheralManager {
    /// Create new peripheral manager with configuration.
    pub fn new(config: PeripheralConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);

        Self {
            keypad: None,
            nfc: None,
            event_tx,
            event_rx,
            config,
        }
    }

    /// Register the keypad.
    pub fn register_keypad(&mut self, device: AnyKeypadDevice) {
        self.keypad = Some(device);
    }

    /// Register the NFC reader.
    pub fn register_nfc(&mut self, device: AnyNfcReader) {
        self.nfc = Some(device);
    }

    pub fn get_stats(&self) -> PeripheralStats {
        PeripheralStats {
            keypad_connected: self.keypad.is_some(),
            nfc_connected: self.nfc.is_some(),
            nfc_available: self.nfc.as_ref().is_some_and(|r| r.is_available()),
        }
    }

    /// Spawn a task per enabled device and return the event handle.
    pub fn start(mut self) -> PeripheralHandle {
        let mut tasks = JoinSet::new();

        if self.config.keypad_enabled
            && let Some(device) = self.keypad.take()
        {
            let map = KeyMap::new().with_dev_skip(self.config.dev_skip);
            tasks.spawn(Self::keypad_task(device, map, self.event_tx.clone()));
        }

        if self.config.nfc_enabled
            && let Some(device) = self.nfc.take()
        {
            if device.is_available() {
                tasks.spawn(Self::nfc_task(device, self.event_tx.clone()));
            } else {
                info!("NFC reader unavailable, manual override only");
            }
        }

        PeripheralHandle {
            event_rx: self.event_rx,
            tasks,
        }
    }

    async fn keypad_task(
        mut device: AnyKeypadDevice,
        mut map: KeyMap,
        tx: mpsc::Sender<PeripheralEvent>,
    ) -> Result<()> {
        loop {
            match device.read_event().await {
                Ok(event) => {
                    for key in map.map(event) {
                        if !Self::forward(&tx, PeripheralEvent::Input(key.into())).await {
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    Self::report(&tx, DeviceType::Keypad, &e).await;
                    return Err(e);
                }
            }
        }
    }

    async fn nfc_task(mut device: AnyNfcReader, tx: mpsc::Sender<PeripheralEvent>) -> Result<()> {
        loop {
            match device.wait_for_card().await {
                Ok(card) => {
                    debug!(uid = %card.uid_hex(), "card presented");
                    let event = PeripheralEvent::Input(InputEvent::CardPresented);
                    if !Self::forward(&tx, event).await {
                        return Ok(());
                    }
                }
                Err(e) => {
                    Self::report(&tx, DeviceType::Nfc, &e).await;
                    return Err(e);
                }
            }
        }
    }

    /// Send an event, backing off once if the channel is full.
    ///
    /// Returns `false` once the receiving side is gone.
    async fn forward(tx: &mpsc::Sender<PeripheralEvent>, event: PeripheralEvent) -> bool {
        match tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                tx.send(event).await.is_ok()
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    async fn report(
        tx: &mpsc::Sender<PeripheralEvent>,
        device_type: DeviceType,
        error: &crate::HardwareError,
    ) {
        if error.is_disconnect() {
            info!(%device_type, %error, "device task stopped");
        } else {
            warn!(%device_type, %error, "device task stopped");
        }
        let _ = tx
            .send(PeripheralEvent::DeviceError {
                device_type,
                error: error.to_string(),
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockKeypad, MockNfc};
    use crate::traits::KeypadInput;
    use suitcase_core::Key;

    #[test]
    fn test_peripheral_config_default() {
        let config = PeripheralConfig::default();
        assert!(config.keypad_enabled);
        assert!(config.nfc_enabled);
        assert!(!config.dev_skip);
    }

    #[test]
    fn test_device_type_display() {
        assert_eq!(DeviceType::Keypad.to_string(), "Keypad");
        assert_eq!(DeviceType::Nfc.to_string(), "NFC");
    }

    #[test]
    fn test_manager_get_stats() {
        let mut manager = PeripheralManager::new(PeripheralConfig::default());

        let (keypad, _) = MockKeypad::new();
        manager.register_keypad(AnyKeypadDevice::Mock(keypad));
        let (reader, _) = MockNfc::unavailable();
        manager.register_nfc(AnyNfcReader::Mock(reader));

        let stats = manager.get_stats();
        assert!(stats.keypad_connected);
        assert!(stats.nfc_connected);
        assert!(!stats.nfc_available);
    }

    #[tokio::test]
    async fn test_manager_keypad_events() {
        let mut manager = PeripheralManager::new(PeripheralConfig::default());

        let (keypad, keypad_handle) = MockKeypad::new();
        manager.register_keypad(AnyKeypadDevice::Mock(keypad));

        let mut handle = manager.start();

        keypad_handle.type_symbols("4").await.unwrap();
        keypad_handle.press(KeypadInput::Hash).await.unwrap();
        keypad_handle.release(KeypadInput::Hash).await.unwrap();
        keypad_handle.tap(KeypadInput::BlueButton).await.unwrap();

        let expected = [
            Key::symbol('4').unwrap(),
            Key::MenuHoldStart,
            Key::MenuHoldEnd,
            Key::Confirm,
        ];
        for key in expected {
            assert_eq!(
                handle.recv().await,
                Some(PeripheralEvent::Input(InputEvent::Key(key)))
            );
        }

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_manager_dev_skip_on_star() {
        let mut manager = PeripheralManager::new(PeripheralConfig {
            dev_skip: true,
            ..PeripheralConfig::default()
        });

        let (keypad, keypad_handle) = MockKeypad::new();
        manager.register_keypad(AnyKeypadDevice::Mock(keypad));
        let mut handle = manager.start();

        keypad_handle.press(KeypadInput::Star).await.unwrap();

        assert_eq!(
            handle.recv().await,
            Some(PeripheralEvent::Input(Key::SignalStart.into()))
        );
        assert_eq!(
            handle.recv().await,
            Some(PeripheralEvent::Input(Key::DevSkip.into()))
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_manager_nfc_events() {
        let mut manager = PeripheralManager::new(PeripheralConfig::default());

        let (reader, reader_handle) = MockNfc::new();
        manager.register_nfc(AnyNfcReader::Mock(reader));
        let mut handle = manager.start();

        reader_handle.present_card(vec![1, 2, 3, 4]).await.unwrap();

        assert_eq!(
            handle.recv().await,
            Some(PeripheralEvent::Input(InputEvent::CardPresented))
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_manager_reports_device_error() {
        let mut manager = PeripheralManager::new(PeripheralConfig::default());

        let (keypad, keypad_handle) = MockKeypad::new();
        manager.register_keypad(AnyKeypadDevice::Mock(keypad));
        let mut handle = manager.start();

        drop(keypad_handle);

        match handle.recv().await {
            Some(PeripheralEvent::DeviceError { device_type, .. }) => {
                assert_eq!(device_type, DeviceType::Keypad);
            }
            other => panic!("expected device error, got {other:?}"),
        }

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_manager_graceful_shutdown() {
        let manager = PeripheralManager::new(PeripheralConfig::default());
        let handle = manager.start();
        handle.shutdown().await.unwrap();
    }
}
