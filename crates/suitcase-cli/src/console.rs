//! Line commands typed on stdin, replayed as keypad and reader input.
//!
//! Key commands go through the mock keypad so they take the same path as
//! real key transitions ([`KeyMap`](suitcase_hardware::KeyMap) included).

use anyhow::{Context, Result, bail};
use std::str::FromStr;
use std::time::Duration;
use suitcase_core::{InputEvent, Key, KeypadSymbol};
use suitcase_game::GameSnapshot;
use suitcase_hardware::mock::{MockKeypadHandle, MockNfcHandle};
use suitcase_hardware::traits::KeypadInput;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

pub const HELP: &str = "\
commands:
  0-9 A-D    type keypad symbols (e.g. 1234AB)
  ok         blue button (confirm)
  del        red button (cancel)
  hold       press # and keep it down
  release    release #
  menu       hold # long enough to return to the menu
  star       press * and keep it down
  unstar     release *
  skip       jump the countdown forward (needs AIRSOFT_DEV_SKIP)
  card       present an NFC card
  state      print the current snapshot as JSON
  help       show this list
  quit       leave the harness";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Symbols(Vec<KeypadSymbol>),
    Confirm,
    Cancel,
    Hold,
    Release,
    Menu,
    Star,
    Unstar,
    Skip,
    Card,
    State,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let word = line.trim();
        let command = match word.to_ascii_lowercase().as_str() {
            "" => bail!("empty command"),
            "ok" => Self::Confirm,
            "del" => Self::Cancel,
            "hold" => Self::Hold,
            "release" => Self::Release,
            "menu" => Self::Menu,
            "star" => Self::Star,
            "unstar" => Self::Unstar,
            "skip" => Self::Skip,
            "card" => Self::Card,
            "state" => Self::State,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Symbols(
                word.chars()
                    .map(KeypadSymbol::new)
                    .collect::<suitcase_core::Result<_>>()
                    .with_context(|| format!("unknown command `{word}`"))?,
            ),
        };
        Ok(command)
    }
}

/// Whether the console keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything a command can act on.
#[derive(Debug)]
pub struct Console {
    keypad: MockKeypadHandle,
    cards: Option<MockNfcHandle>,
    events: mpsc::Sender<InputEvent>,
    snapshots: watch::Receiver<GameSnapshot>,
    menu_hold: Duration,
    dev_skip: bool,
}

impl Console {
    pub fn new(
        keypad: MockKeypadHandle,
        events: mpsc::Sender<InputEvent>,
        snapshots: watch::Receiver<GameSnapshot>,
    ) -> Self {
        Self {
            keypad,
            cards: None,
            events,
            snapshots,
            menu_hold: Duration::from_millis(suitcase_core::constants::MENU_HOLD_MS),
            dev_skip: false,
        }
    }

    /// Route `card` to a simulated reader. Without one the command is refused.
    pub fn with_cards(mut self, cards: MockNfcHandle) -> Self {
        self.cards = Some(cards);
        self
    }

    pub fn with_menu_hold(mut self, hold: Duration) -> Self {
        self.menu_hold = hold;
        self
    }

    pub fn with_dev_skip(mut self, enabled: bool) -> Self {
        self.dev_skip = enabled;
        self
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Returns an error when a device channel is closed or the command is not
    /// available in this session.
    pub async fn execute(&self, command: Command) -> Result<Flow> {
        debug!(?command, "console command");
        match command {
            Command::Symbols(symbols) => {
                for symbol in symbols {
                    self.keypad.tap(KeypadInput::Symbol(symbol)).await?;
                }
            }
            Command::Confirm => self.keypad.tap(KeypadInput::BlueButton).await?,
            Command::Cancel => self.keypad.tap(KeypadInput::RedButton).await?,
            Command::Hold => self.keypad.press(KeypadInput::Hash).await?,
            Command::Release => self.keypad.release(KeypadInput::Hash).await?,
            Command::Menu => {
                self.keypad.press(KeypadInput::Hash).await?;
                tokio::time::sleep(self.menu_hold).await;
                self.keypad.release(KeypadInput::Hash).await?;
            }
            Command::Star => self.keypad.press(KeypadInput::Star).await?,
            Command::Unstar => self.keypad.release(KeypadInput::Star).await?,
            Command::Skip => {
                if !self.dev_skip {
                    bail!("dev skip is disabled, set AIRSOFT_DEV_SKIP=1");
                }
                self.events
                    .send(Key::DevSkip.into())
                    .await
                    .context("game loop stopped")?;
            }
            Command::Card => match &self.cards {
                Some(cards) => cards.present_card(vec![0x04, 0xC0, 0xFF, 0xEE]).await?,
                None => bail!("no simulated reader in this session"),
            },
            Command::State => {
                let json = serde_json::to_string_pretty(&*self.snapshots.borrow())?;
                println!("{json}");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

/// Read commands until `quit` or end of input.
///
/// Bad commands are reported and skipped.
///
/// # Errors
///
/// Returns an error if reading the input fails.
pub async fn run<R>(console: Console, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("reading console input")? {
        if line.trim().is_empty() {
            continue;
        }
        let outcome = match line.parse::<Command>() {
            Ok(command) => console.execute(command).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                warn!(error = %e, "command failed");
                eprintln!("error: {e:#}");
            }
        }
    }
    Ok(())
}
