//! Game and difficulty selection.

use serde::Serialize;
use suitcase_core::{Difficulty, GameKind, Key};
use tracing::debug;

/// Which list the menu is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuLevel {
    #[default]
    SelectGame,
    SelectBombDifficulty,
}

/// What the controller should do after a menu key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Start(GameKind, Difficulty),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuState {
    pub level: MenuLevel,
    /// Cursor into the current list (0-based).
    pub selection: Option<usize>,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels of the list currently shown.
    pub fn options(&self) -> [String; 3] {
        match self.level {
            MenuLevel::SelectGame => GameKind::ALL.map(|g| g.to_string()),
            MenuLevel::SelectBombDifficulty => Difficulty::ALL.map(|d| d.to_string()),
        }
    }

    pub fn handle_key(&mut self, key: Key) -> MenuAction {
        match key {
            Key::Symbol(symbol) => {
                if let Some(index) = symbol.menu_index() {
                    self.selection = Some(index);
                }
                MenuAction::None
            }
            Key::Confirm => self.confirm(),
            Key::Cancel => {
                if self.level == MenuLevel::SelectBombDifficulty {
                    *self = Self::new();
                }
                MenuAction::None
            }
            _ => MenuAction::None,
        }
    }

    fn confirm(&mut self) -> MenuAction {
        let Some(index) = self.selection else {
            return MenuAction::None;
        };
        match self.level {
            MenuLevel::SelectGame => match GameKind::from_index(index) {
                Ok(GameKind::Bomb) => {
                    debug!("bomb selected, asking for difficulty");
                    self.level = MenuLevel::SelectBombDifficulty;
                    self.selection = None;
                    MenuAction::None
                }
                Ok(game) => MenuAction::Start(game, Difficulty::default()),
                Err(_) => MenuAction::None,
            },
            MenuLevel::SelectBombDifficulty => match Difficulty::from_index(index) {
                Ok(difficulty) => MenuAction::Start(GameKind::Bomb, difficulty),
                Err(_) => MenuAction::None,
            },
        }
    }
}
