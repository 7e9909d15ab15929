//! Headless console harness for the airsoft suitcase.
//!
//! Runs a full game session without the prop: keypad and card input are typed
//! on stdin, LED commands go to the log and the game state is redrawn as text
//! after every change. See [`settings`] for the environment variables.

mod console;
mod display;
mod settings;

use anyhow::{Context, Result};
use console::Console;
use display::SnapshotDisplay;
use settings::Settings;
use suitcase_core::InputEvent;
use suitcase_game::{GameController, GameSnapshot, runtime};
use suitcase_hardware::devices::{AnyKeypadDevice, AnyNfcReader};
use suitcase_hardware::mock::{MockKeypad, MockNfc, MockNfcHandle};
use suitcase_hardware::sim::{CommandAudio, TracingLed};
use suitcase_hardware::{
    AudioCue, AudioSignaler, PeripheralConfig, PeripheralEvent, PeripheralHandle,
    PeripheralManager,
};
use tokio::io::BufReader;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let settings = Settings::from_env();
    info!(
        version = suitcase_core::VERSION,
        audio = settings.game.audio_enabled,
        nfc_auto_unlock = settings.game.hard_mode_auto_unlock,
        dev_skip = settings.dev_skip,
        "starting suitcase"
    );

    let mut manager = PeripheralManager::new(PeripheralConfig {
        dev_skip: settings.dev_skip,
        ..PeripheralConfig::default()
    });
    let (keypad, keys) = MockKeypad::with_name("Console Keypad".to_string());
    manager.register_keypad(AnyKeypadDevice::Mock(keypad));
    let (reader, cards) = open_reader();
    manager.register_nfc(reader);
    let nfc_available = manager.get_stats().nfc_available;

    let controller = GameController::builder(TracingLed::new(), Speaker::open(&settings))
        .with_config(settings.game.clone())
        .with_nfc_available(nfc_available)
        .build()
        .context("invalid game configuration")?;
    let snapshots = controller.subscribe();

    let (events_tx, events_rx) = mpsc::channel(64);
    let forwarder = tokio::spawn(forward(manager.start(), events_tx.clone()));
    let screen = tokio::spawn(show(controller.subscribe()));
    let game = tokio::spawn(runtime::run(controller, events_rx));

    let mut console = Console::new(keys, events_tx, snapshots)
        .with_menu_hold(settings.game.menu_hold())
        .with_dev_skip(settings.dev_skip);
    if let Some(cards) = cards {
        console = console.with_cards(cards);
    }

    println!("{}", console::HELP);
    console::run(console, BufReader::new(tokio::io::stdin())).await?;

    forwarder.abort();
    let controller = game.await.context("game loop panicked")?;
    for transition in controller.history() {
        debug!(from = %transition.from, to = %transition.to, at = ?transition.at, "phase");
    }
    drop(controller);
    screen.await.context("display task panicked")?;

    info!("bye");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The card reader, plus a handle for the `card` command when it is simulated.
fn open_reader() -> (AnyNfcReader, Option<MockNfcHandle>) {
    #[cfg(feature = "hardware-pcsc")]
    {
        let reader = suitcase_hardware::pcsc_reader::PcscReader::open();
        if suitcase_hardware::NfcReader::is_available(&reader) {
            return (AnyNfcReader::Pcsc(reader), None);
        }
    }

    let (reader, cards) = MockNfc::with_name("Console Reader".to_string());
    (AnyNfcReader::Mock(reader), Some(cards))
}

/// Move device input into the game loop until either side goes away.
async fn forward(mut peripherals: PeripheralHandle, events: mpsc::Sender<InputEvent>) {
    while let Some(event) = peripherals.recv().await {
        match event {
            PeripheralEvent::Input(input) => {
                if events.send(input).await.is_err() {
                    break;
                }
            }
            PeripheralEvent::DeviceError { device_type, error } => {
                warn!(%device_type, %error, "input device lost");
            }
            other => debug!(?other, "ignored peripheral event"),
        }
    }
    if let Err(e) = peripherals.shutdown().await {
        warn!(error = %e, "peripheral shutdown failed");
    }
}

/// Print the display whenever the snapshot changes.
async fn show(mut snapshots: watch::Receiver<GameSnapshot>) {
    let mut display = SnapshotDisplay::new();
    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if display.render(&snapshot) {
            println!("{display}");
        }
        if snapshots.changed().await.is_err() {
            break;
        }
    }
}

/// Audio output for the harness: an external player when one is installed.
#[derive(Debug)]
enum Speaker {
    Player(CommandAudio),
    Silent,
}

impl Speaker {
    fn open(settings: &Settings) -> Self {
        if !settings.game.audio_enabled {
            return Self::Silent;
        }
        match CommandAudio::detect(&settings.audio_dir) {
            Ok(player) => Self::Player(player),
            Err(e) => {
                warn!(error = %e, "audio player unavailable, cues will be logged only");
                Self::Silent
            }
        }
    }
}

impl AudioSignaler for Speaker {
    fn play(&mut self, cue: AudioCue) -> suitcase_hardware::Result<()> {
        match self {
            Self::Player(player) => player.play(cue),
            Self::Silent => {
                debug!(%cue, "cue");
                Ok(())
            }
        }
    }
}
