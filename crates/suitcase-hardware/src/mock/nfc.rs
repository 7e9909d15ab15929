//! Mock NFC reader.

use crate::{
    Result,
    traits::{CardData, NfcReader},
    types::DeviceInfo,
};
use tokio::sync::mpsc;

/// Mock NFC reader fed through a [`MockNfcHandle`].
///
/// # Examples
///
/// ```
/// use suitcase_hardware::mock::MockNfc;
/// use suitcase_hardware::traits::NfcReader;
///
/// #[tokio::main]
/// async fn main() -> suitcase_hardware::Result<()> {
///     let (mut reader, handle) = MockNfc::new();
///
///     handle.present_card(vec![0x04, 0xAB, 0xCD, 0xEF]).await?;
///
///     let card = reader.wait_for_card().await?;
///     assert_eq!(card.uid_hex(), "04:AB:CD:EF");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNfc {
    card_rx: mpsc::Receiver<CardData>,
    name: String,
    available: bool,
}

impl MockNfc {
    pub fn new() -> (Self, MockNfcHandle) {
        Self::with_name("Mock NFC Reader".to_string())
    }

    pub fn with_name(name: String) -> (Self, MockNfcHandle) {
        let (card_tx, card_rx) = mpsc::channel(8);

        let reader = Self {
            card_rx,
            name: name.clone(),
            available: true,
        };

        (reader, MockNfcHandle { card_tx, name })
    }

    /// A reader that reports itself as missing, like a prop without NFC.
    pub fn unavailable() -> (Self, MockNfcHandle) {
        let (mut reader, handle) = Self::new();
        reader.available = false;
        (reader, handle)
    }
}

impl NfcReader for MockNfc {
    async fn wait_for_card(&mut self) -> Result<CardData> {
        self.card_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("NFC card channel closed"))
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock NFC v1.0"))
    }
}

/// Handle for presenting cards to a mock reader.
#[derive(Debug, Clone)]
pub struct MockNfcHandle {
    card_tx: mpsc::Sender<CardData>,
    name: String,
}

impl MockNfcHandle {
    /// Present a card with the given UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_card(&self, uid: Vec<u8>) -> Result<()> {
        self.card_tx
            .send(CardData::new(uid))
            .await
            .map_err(|_| crate::HardwareError::disconnected("NFC card channel closed"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_nfc_present_and_read() {
        let (mut reader, handle) = MockNfc::new();

        handle.present_card(vec![0x01, 0x02, 0x03, 0x04]).await.unwrap();

        let card = reader.wait_for_card().await.unwrap();
        assert_eq!(card.uid, vec![0x01, 0x02, 0x03, 0x04]);
    }

    #[tokio::test]
    async fn test_mock_nfc_availability() {
        let (reader, _handle) = MockNfc::new();
        assert!(reader.is_available());

        let (reader, _handle) = MockNfc::unavailable();
        assert!(!reader.is_available());
    }

    #[tokio::test]
    async fn test_mock_nfc_closed_channel() {
        let (mut reader, handle) = MockNfc::new();
        drop(handle);
        assert!(reader.wait_for_card().await.is_err());
    }
}
