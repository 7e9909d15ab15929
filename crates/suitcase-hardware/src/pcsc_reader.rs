//! PC/SC contactless reader (ACR122U, ACR1252 and compatibles).
//!
//! The reader is polled on the blocking thread pool. A card is reported once
//! when it arrives; it has to leave the field before it is reported again.

use crate::{
    HardwareError, Result,
    traits::{CardData, NfcReader},
    types::DeviceInfo,
};
use pcsc::{Context, Protocols, Scope, ShareMode};
use std::ffi::CString;
use std::time::Duration;
use tracing::{debug, info, warn};

/// GET DATA (UID) pseudo-APDU understood by most contactless readers.
const GET_UID_APDU: [u8; 5] = [0xFF, 0xCA, 0x00, 0x00, 0x00];

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

pub struct PcscReader {
    context: Option<Context>,
    reader: Option<CString>,
    poll_interval: Duration,
    card_in_field: bool,
}

impl std::fmt::Debug for PcscReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcscReader")
            .field("reader", &self.reader)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl PcscReader {
    /// Find a reader, preferring the contactless (PICC) interface.
    ///
    /// Never fails: without a PC/SC service or reader the returned value
    /// reports itself as unavailable.
    pub fn open() -> Self {
        let mut this = Self {
            context: None,
            reader: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            card_in_field: false,
        };

        let context = match Context::establish(Scope::User) {
            Ok(context) => context,
            Err(e) => {
                warn!(error = %e, "PC/SC service unavailable");
                return this;
            }
        };

        match context.list_readers_owned() {
            Ok(readers) => {
                let picc = readers
                    .iter()
                    .find(|name| name.to_string_lossy().contains("PICC"))
                    .cloned();
                this.reader = picc.or_else(|| readers.into_iter().next());
            }
            Err(e) => warn!(error = %e, "failed to enumerate PC/SC readers"),
        }

        match &this.reader {
            Some(name) => info!(reader = %name.to_string_lossy(), "NFC reader found"),
            None => warn!("no PC/SC readers found"),
        }
        this.context = Some(context);
        this
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// One blocking poll: `Ok(None)` when no card is in the field.
    fn poll(context: &Context, reader: &CString) -> Result<Option<CardData>> {
        let card = match context.connect(reader, ShareMode::Shared, Protocols::ANY) {
            Ok(card) => card,
            Err(
                pcsc::Error::NoSmartcard
                | pcsc::Error::RemovedCard
                | pcsc::Error::UnpoweredCard
                | pcsc::Error::UnresponsiveCard
                | pcsc::Error::Timeout,
            ) => return Ok(None),
            Err(pcsc::Error::ReaderUnavailable | pcsc::Error::UnknownReader) => {
                return Err(HardwareError::disconnected(reader.to_string_lossy()));
            }
            Err(e) => return Err(HardwareError::communication(e.to_string())),
        };

        let mut buffer = [0u8; pcsc::MAX_BUFFER_SIZE];
        let uid = match card.transmit(&GET_UID_APDU, &mut buffer) {
            Ok([data @ .., 0x90, 0x00]) => data.to_vec(),
            Ok(_) | Err(_) => Vec::new(),
        };
        Ok(Some(CardData::new(uid)))
    }
}

impl NfcReader for PcscReader {
    async fn wait_for_card(&mut self) -> Result<CardData> {
        let (Some(context), Some(reader)) = (self.context.clone(), self.reader.clone()) else {
            return Err(HardwareError::disconnected("no PC/SC reader"));
        };

        loop {
            let ctx = context.clone();
            let name = reader.clone();
            let polled = tokio::task::spawn_blocking(move || Self::poll(&ctx, &name))
                .await
                .map_err(|e| HardwareError::other(e.to_string()))??;

            match polled {
                Some(card) if !self.card_in_field => {
                    self.card_in_field = true;
                    info!(uid = %card.uid_hex(), "NFC card detected");
                    return Ok(card);
                }
                Some(_) => {}
                None => {
                    if self.card_in_field {
                        debug!("NFC card left the field");
                    }
                    self.card_in_field = false;
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn is_available(&self) -> bool {
        self.reader.is_some()
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        let name = self
            .reader
            .as_ref()
            .map(|r| r.to_string_lossy().into_owned())
            .ok_or_else(|| HardwareError::disconnected("no PC/SC reader"))?;
        Ok(DeviceInfo::new(name, "PC/SC"))
    }
}
