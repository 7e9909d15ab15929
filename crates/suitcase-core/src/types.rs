use crate::{Result, constants::KEYPAD_ALPHABET, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single code symbol from the 14-key alphabet (`0-9`, `A-D`).
///
/// Lowercase letters are normalized to uppercase on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct KeypadSymbol(char);

impl KeypadSymbol {
    /// Create a symbol with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidSymbol` if `c` is not part of the keypad alphabet.
    pub fn new(c: char) -> Result<Self> {
        let upper = c.to_ascii_uppercase();
        if KEYPAD_ALPHABET.contains(&upper) {
            Ok(Self(upper))
        } else {
            Err(Error::InvalidSymbol(c))
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        self.0
    }

    /// One-based menu position for `1`, `2` and `3`, converted to a zero-based index.
    #[must_use]
    pub fn menu_index(self) -> Option<usize> {
        match self.0 {
            '1' => Some(0),
            '2' => Some(1),
            '3' => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for KeypadSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for KeypadSymbol {
    type Error = Error;

    fn try_from(c: char) -> Result<Self> {
        KeypadSymbol::new(c)
    }
}

impl From<KeypadSymbol> for char {
    fn from(symbol: KeypadSymbol) -> Self {
        symbol.0
    }
}

/// Logical input accepted by the game controller.
///
/// Mapping physical buttons to these keys (debouncing, hold detection of the
/// raw hardware) is the job of the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Code symbol or menu position.
    Symbol(KeypadSymbol),
    /// Submit the buffer, confirm a selection, or pick team blue.
    Confirm,
    /// Clear the buffer, go back a menu level, or pick team red.
    Cancel,
    /// Menu key went down.
    MenuHoldStart,
    /// Menu key was released.
    MenuHoldEnd,
    /// Signal key went down.
    SignalStart,
    /// Signal key was released.
    SignalEnd,
    /// Diagnostic jump to the next countdown skip target.
    DevSkip,
}

impl Key {
    /// Create a symbol key.
    ///
    /// # Errors
    /// Returns `Error::InvalidSymbol` if `c` is not part of the keypad alphabet.
    pub fn symbol(c: char) -> Result<Self> {
        KeypadSymbol::new(c).map(Self::Symbol)
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<KeypadSymbol> {
        match self {
            Self::Symbol(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Symbol(s) => write!(f, "{s}"),
            Key::Confirm => write!(f, "confirm"),
            Key::Cancel => write!(f, "cancel"),
            Key::MenuHoldStart => write!(f, "menu-hold-start"),
            Key::MenuHoldEnd => write!(f, "menu-hold-end"),
            Key::SignalStart => write!(f, "signal-start"),
            Key::SignalEnd => write!(f, "signal-end"),
            Key::DevSkip => write!(f, "dev-skip"),
        }
    }
}

impl std::str::FromStr for Key {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "confirm" => Ok(Key::Confirm),
            "cancel" => Ok(Key::Cancel),
            "menu-hold-start" => Ok(Key::MenuHoldStart),
            "menu-hold-end" => Ok(Key::MenuHoldEnd),
            "signal-start" => Ok(Key::SignalStart),
            "signal-end" => Ok(Key::SignalEnd),
            "dev-skip" => Ok(Key::DevSkip),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::symbol(c),
                    (Some(c), Some(_)) => Err(Error::InvalidSymbol(c)),
                    (None, _) => Err(Error::InvalidSymbol(' ')),
                }
            }
        }
    }
}

/// Event delivered to the controller by the input side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    /// Logical key from the keypad.
    Key(Key),
    /// An NFC card was presented to the reader.
    CardPresented,
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        InputEvent::Key(key)
    }
}

/// Playing team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Blue,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Team::Red => write!(f, "RED"),
            Team::Blue => write!(f, "BLUE"),
        }
    }
}

/// Bomb difficulty, selected on the second menu level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Look up a difficulty by its zero-based menu index.
    ///
    /// # Errors
    /// Returns `Error::InvalidPosition` for indices outside the menu.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidPosition(index.min(u8::MAX as usize) as u8))
    }

    /// Number of re-entry checkpoints the countdown will pause at.
    #[must_use]
    pub fn checkpoint_count(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Selectable mini-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Bomb,
    Bunker,
    Flag,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Bomb, GameKind::Bunker, GameKind::Flag];

    /// Look up a game by its zero-based menu index.
    ///
    /// # Errors
    /// Returns `Error::InvalidPosition` for indices outside the menu.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidPosition(index.min(u8::MAX as usize) as u8))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameKind::Bomb => write!(f, "Bomb"),
            GameKind::Bunker => write!(f, "Bunker"),
            GameKind::Flag => write!(f, "Flag"),
        }
    }
}

/// Which part of the session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Menu,
    Bomb,
    Bunker,
    Flag,
}

impl From<GameKind> for Phase {
    fn from(kind: GameKind) -> Self {
        match kind {
            GameKind::Bomb => Phase::Bomb,
            GameKind::Bunker => Phase::Bunker,
            GameKind::Flag => Phase::Flag,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phase::Menu => write!(f, "Menu"),
            Phase::Bomb => write!(f, "Bomb"),
            Phase::Bunker => write!(f, "Bunker"),
            Phase::Flag => write!(f, "Flag"),
        }
    }
}
