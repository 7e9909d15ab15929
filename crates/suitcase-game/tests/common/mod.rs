//! Shared helpers for the game integration tests.
//!
//! Every helper drives a [`GameController`] wired to the recording mocks, so
//! tests can assert on the snapshot, the LED state and the cues played.

#![allow(dead_code)]

use std::time::Duration;
use suitcase_core::{Difficulty, GameConfig, GameKind, Key};
use suitcase_game::{BombState, BunkerState, GameController};
use suitcase_hardware::mock::{MockAudio, MockLed};

pub type TestGame = GameController<MockLed, MockAudio>;

/// Seed used unless a test needs a specific one.
pub const SEED: u64 = 42;

pub fn new_game() -> TestGame {
    game_with(GameConfig::default(), SEED)
}

pub fn game_with(config: GameConfig, seed: u64) -> TestGame {
    GameController::builder(MockLed::new(), MockAudio::new())
        .with_config(config)
        .with_seed(seed)
        .build()
        .expect("valid test configuration")
}

pub fn press(game: &mut TestGame, c: char) {
    game.handle_input(Key::symbol(c).expect("keypad symbol"));
}

/// Type `code` and confirm it.
pub fn enter_code(game: &mut TestGame, code: &str) {
    for c in code.chars() {
        press(game, c);
    }
    game.handle_input(Key::Confirm);
}

pub fn start_game(game: &mut TestGame, kind: GameKind) {
    let position = match kind {
        GameKind::Bomb => '1',
        GameKind::Bunker => '2',
        GameKind::Flag => '3',
    };
    press(game, position);
    game.handle_input(Key::Confirm);
}

pub fn start_bomb(game: &mut TestGame, difficulty: Difficulty) {
    start_game(game, GameKind::Bomb);
    let position = match difficulty {
        Difficulty::Easy => '1',
        Difficulty::Medium => '2',
        Difficulty::Hard => '3',
    };
    press(game, position);
    game.handle_input(Key::Confirm);
}

pub fn bomb(game: &TestGame) -> BombState {
    game.snapshot().bomb().cloned().expect("bomb mode active")
}

pub fn bunker(game: &TestGame) -> BunkerState {
    game.snapshot().bunker().cloned().expect("bunker mode active")
}

/// Enter whatever code the current bomb stage expects.
pub fn enter_expected_code(game: &mut TestGame) {
    let code = bomb(game)
        .expected_code()
        .map(ToString::to_string)
        .expect("stage takes a code");
    enter_code(game, &code);
}

/// A code guaranteed to differ from every generated code.
pub fn wrong_code(game: &mut TestGame) {
    enter_code(game, "0");
}

/// Start an Easy bomb and arm it.
pub fn armed_easy_bomb() -> TestGame {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Easy);
    enter_expected_code(&mut game);
    game
}

pub fn advance_secs(game: &mut TestGame, secs: u64) {
    game.advance(Duration::from_secs(secs));
}

pub fn advance_ms(game: &mut TestGame, ms: u64) {
    game.advance(Duration::from_millis(ms));
}
