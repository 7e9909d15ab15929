//! Immutable view of the session handed to presentations.

use crate::bomb::BombState;
use crate::bunker::BunkerState;
use crate::flag::FlagState;
use crate::menu::MenuState;
use serde::Serialize;
use suitcase_core::Phase;

/// State of the active mode. Exactly one mode is active at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Mode {
    Menu(MenuState),
    Bomb(BombState),
    Bunker(BunkerState),
    Flag(FlagState),
}

impl Mode {
    pub fn phase(&self) -> Phase {
        match self {
            Mode::Menu(_) => Phase::Menu,
            Mode::Bomb(_) => Phase::Bomb,
            Mode::Bunker(_) => Phase::Bunker,
            Mode::Flag(_) => Phase::Flag,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Menu(MenuState::default())
    }
}

/// Everything a presentation needs to render one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Bumped on every published change.
    pub revision: u64,
    /// Whether a card reader is attached; without one the override key is
    /// the only way past the card step.
    pub nfc_available: bool,
    pub mode: Mode,
}

impl GameSnapshot {
    pub fn phase(&self) -> Phase {
        self.mode.phase()
    }

    pub fn bomb(&self) -> Option<&BombState> {
        match &self.mode {
            Mode::Bomb(state) => Some(state),
            _ => None,
        }
    }

    pub fn bunker(&self) -> Option<&BunkerState> {
        match &self.mode {
            Mode::Bunker(state) => Some(state),
            _ => None,
        }
    }

    pub fn flag(&self) -> Option<&FlagState> {
        match &self.mode {
            Mode::Flag(state) => Some(state),
            _ => None,
        }
    }

    pub fn menu(&self) -> Option<&MenuState> {
        match &self.mode {
            Mode::Menu(state) => Some(state),
            _ => None,
        }
    }
}
