//! Bunker and flag modes through the controller.

mod common;

use common::*;
use std::time::Duration;
use suitcase_core::{GameKind, Key, Phase, Team};
use suitcase_game::TimerKey;
use suitcase_hardware::mock::{IndicatorState, StripState};
use suitcase_hardware::{AudioCue, Indicator, LedColor};

fn bunker_game() -> TestGame {
    let mut game = new_game();
    start_game(&mut game, GameKind::Bunker);
    game
}

#[test]
fn test_bunker_starts_dark_and_ticking() {
    let game = bunker_game();
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::Off);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::Off);
    assert_eq!(game.leds().strip(), StripState::Off);
    assert!(game.scheduler().is_pending(TimerKey::BunkerTick));
}

#[test]
fn test_bunker_holder_switches() {
    let mut game = bunker_game();
    advance_secs(&mut game, 4);
    assert_eq!((bunker(&game).red_secs, bunker(&game).blue_secs), (0, 0));

    game.handle_input(Key::Cancel);
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::On);
    assert_eq!(
        game.leds().strip(),
        StripState::Pulsing {
            color: LedColor::Red,
            period: Duration::from_millis(280)
        }
    );
    advance_secs(&mut game, 7);

    game.handle_input(Key::Confirm);
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::Off);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::On);
    advance_secs(&mut game, 3);

    let state = bunker(&game);
    assert_eq!(state.seconds(Team::Red), 7);
    assert_eq!(state.seconds(Team::Blue), 3);
    assert_eq!(state.active_team, Some(Team::Blue));
    assert_eq!(state.winner, None);
}

#[test]
fn test_bunker_winner_is_final() {
    let mut game = bunker_game();
    game.handle_input(Key::Cancel);
    advance_secs(&mut game, 599);
    assert_eq!(bunker(&game).winner, None);

    advance_secs(&mut game, 1);
    let state = bunker(&game);
    assert_eq!(state.winner, Some(Team::Red));
    assert_eq!(state.red_secs, 600);
    assert!(!game.scheduler().is_pending(TimerKey::BunkerTick));

    game.handle_input(Key::Confirm);
    advance_secs(&mut game, 300);
    let after = bunker(&game);
    assert_eq!(after.red_secs, 600);
    assert_eq!(after.blue_secs, 0);
    assert_eq!(after.active_team, Some(Team::Red));
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::On);
}

#[test]
fn test_bunker_signal_after_win() {
    let mut game = bunker_game();
    game.handle_input(Key::SignalStart);
    assert!(!bunker(&game).signal_active);

    game.handle_input(Key::Confirm);
    advance_secs(&mut game, 600);
    assert_eq!(bunker(&game).winner, Some(Team::Blue));

    game.handle_input(Key::SignalStart);
    assert!(bunker(&game).signal_active);
    advance_secs(&mut game, 1);
    assert_eq!(game.audio().count(AudioCue::Beep), 4);

    game.handle_input(Key::SignalEnd);
    assert_eq!(game.phase(), Phase::Menu);
    assert!(game.scheduler().is_empty());

    advance_secs(&mut game, 5);
    assert_eq!(game.audio().count(AudioCue::Beep), 4);
}

#[test]
fn test_flag_last_capture_wins() {
    let mut game = new_game();
    start_game(&mut game, GameKind::Flag);
    assert_eq!(game.snapshot().flag().and_then(|f| f.controlling_team), None);

    game.handle_input(Key::Confirm);
    assert_eq!(
        game.leds().strip(),
        StripState::Pulsing {
            color: LedColor::Blue,
            period: Duration::from_millis(250)
        }
    );

    game.handle_input(Key::Cancel);
    assert_eq!(
        game.snapshot().flag().and_then(|f| f.controlling_team),
        Some(Team::Red)
    );
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::On);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::Off);
    assert!(game.scheduler().is_empty());
}

#[test]
fn test_inapplicable_keys_are_ignored() {
    let mut game = new_game();
    start_game(&mut game, GameKind::Flag);
    let before = game.snapshot();
    for key in [Key::SignalStart, Key::SignalEnd, Key::DevSkip] {
        game.handle_input(key);
    }
    press(&mut game, '9');
    game.card_presented();
    assert_eq!(game.snapshot(), before);
}
