//! End-to-end tests for bomb mode, driven through the controller with
//! simulated time.

mod common;

use common::*;
use rstest::rstest;
use std::time::Duration;
use suitcase_core::{Difficulty, GameConfig, Key, Phase};
use suitcase_game::{BombOutcome, BombStage, TimerKey};
use suitcase_hardware::mock::{IndicatorState, StripState};
use suitcase_hardware::{AudioCue, Indicator, LedColor};

// ============================================================================
// Arming and countdown
// ============================================================================

#[test]
fn test_easy_bomb_runs_out() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Easy);
    assert_eq!(bomb(&game).stage, BombStage::AwaitCode);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::On);
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::Off);

    enter_expected_code(&mut game);
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Countdown);
    assert_eq!(state.remaining_secs, 600);
    assert_eq!(game.audio().count(AudioCue::Arm), 1);

    advance_secs(&mut game, 599);
    assert_eq!(bomb(&game).remaining_secs, 1);
    assert_eq!(bomb(&game).stage, BombStage::Countdown);

    advance_secs(&mut game, 1);
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Ended);
    assert_eq!(state.outcome, Some(BombOutcome::TimeElapsed));
    assert_eq!(
        state.outcome.map(BombOutcome::message),
        Some("time elapsed, placing team wins")
    );
    assert_eq!(game.audio().count(AudioCue::Arm), 2);
    assert_eq!(game.audio().count(AudioCue::Boom), 0);
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::On);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::Off);
    assert_eq!(game.leds().strip(), StripState::Off);

    advance_ms(&mut game, 2_600);
    assert_eq!(game.audio().count(AudioCue::Boom), 1);
    assert!(game.scheduler().is_empty());
    assert_eq!(game.phase(), Phase::Bomb);
}

#[test]
fn test_arm_sound_suppresses_first_beeps() {
    let mut game = armed_easy_bomb();

    advance_secs(&mut game, 2);
    assert_eq!(game.audio().count(AudioCue::Beep), 0);

    advance_secs(&mut game, 1);
    assert_eq!(game.audio().count(AudioCue::Beep), 1);
}

#[test]
fn test_tiers_switch_at_thresholds() {
    let mut game = armed_easy_bomb();
    let blue = |game: &TestGame| game.leds().indicator(Indicator::Blue);
    let pulse = |ms| StripState::Pulsing {
        color: LedColor::Green,
        period: Duration::from_millis(ms),
    };

    assert_eq!(blue(&game), IndicatorState::Blinking(Duration::from_millis(1_000)));
    assert_eq!(game.leds().strip(), pulse(160));

    advance_secs(&mut game, 179);
    assert_eq!(bomb(&game).remaining_secs, 421);
    assert_eq!(blue(&game), IndicatorState::Blinking(Duration::from_millis(1_000)));

    advance_secs(&mut game, 1);
    assert_eq!(blue(&game), IndicatorState::Blinking(Duration::from_millis(500)));
    assert_eq!(game.leds().strip(), pulse(100));

    advance_secs(&mut game, 179);
    assert_eq!(blue(&game), IndicatorState::Blinking(Duration::from_millis(500)));
    advance_secs(&mut game, 1);
    assert_eq!(bomb(&game).remaining_secs, 240);
    assert_eq!(blue(&game), IndicatorState::Blinking(Duration::from_millis(333)));

    advance_secs(&mut game, 180);
    assert_eq!(bomb(&game).remaining_secs, 60);
    assert_eq!(blue(&game), IndicatorState::Blinking(Duration::from_millis(250)));
    assert_eq!(game.leds().strip(), pulse(50));
}

#[rstest]
#[case(421, 1)]
#[case(300, 2)]
#[case(100, 3)]
#[case(30, 4)]
fn test_beeps_per_second(#[case] remaining: u32, #[case] beeps: usize) {
    let mut game = armed_easy_bomb();
    advance_secs(&mut game, u64::from(600 - remaining - 1));
    advance_ms(&mut game, 999);
    game.audio_mut().clear();

    // The tick brings the first beep, the rest follow within the second.
    advance_ms(&mut game, 1);
    assert_eq!(bomb(&game).remaining_secs, remaining);
    assert_eq!(game.audio().count(AudioCue::Beep), 1);

    advance_ms(&mut game, 999);
    assert_eq!(game.audio().count(AudioCue::Beep), beeps);
}

#[test]
fn test_defuse() {
    let mut game = armed_easy_bomb();
    advance_secs(&mut game, 42);

    enter_expected_code(&mut game);
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Ended);
    assert_eq!(state.outcome, Some(BombOutcome::Defused));
    assert_eq!(state.remaining_secs, 558);
    assert_eq!(game.audio().count(AudioCue::Defuse), 1);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::On);
    assert_eq!(game.leds().strip(), StripState::Solid(LedColor::Blue));
    assert!(game.scheduler().is_empty());

    let frozen = game.snapshot();
    press(&mut game, '1');
    game.handle_input(Key::Confirm);
    advance_secs(&mut game, 100);
    assert_eq!(game.snapshot(), frozen);
}

#[test]
fn test_cancel_clears_input_only() {
    let mut game = armed_easy_bomb();
    press(&mut game, '4');
    press(&mut game, 'B');
    assert_eq!(bomb(&game).input_text(), "4B");

    game.handle_input(Key::Cancel);
    let state = bomb(&game);
    assert!(state.input.is_empty());
    assert_eq!(state.stage, BombStage::Countdown);
    assert_eq!(state.failed_attempts, 0);
}

// ============================================================================
// Wrong codes and lockout
// ============================================================================

fn reach(stage: BombStage) -> TestGame {
    match stage {
        BombStage::AwaitCode => {
            let mut game = new_game();
            start_bomb(&mut game, Difficulty::Easy);
            game
        }
        BombStage::Countdown => armed_easy_bomb(),
        BombStage::AwaitReentry => {
            let mut game = new_game();
            start_bomb(&mut game, Difficulty::Medium);
            let checkpoint = bomb(&game).checkpoints[0];
            enter_expected_code(&mut game);
            advance_secs(&mut game, u64::from(600 - checkpoint));
            game
        }
        other => panic!("cannot enter codes in {other}"),
    }
}

#[rstest]
#[case(BombStage::AwaitCode)]
#[case(BombStage::Countdown)]
#[case(BombStage::AwaitReentry)]
fn test_wrong_codes_escalate(#[case] stage: BombStage) {
    let mut game = reach(stage);
    assert_eq!(bomb(&game).stage, stage);
    let remaining = bomb(&game).remaining_secs;

    wrong_code(&mut game);
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Locked);
    assert_eq!(state.lock_remaining_secs, 30);
    assert_eq!(state.failed_attempts, 1);
    assert_eq!(
        game.leds().indicator(Indicator::Red),
        IndicatorState::Blinking(Duration::from_millis(250))
    );

    // Locked keypad swallows everything.
    type_arm_code(&mut game);
    assert_eq!(bomb(&game).stage, BombStage::Locked);

    advance_secs(&mut game, 29);
    assert_eq!(bomb(&game).lock_remaining_secs, 1);
    advance_secs(&mut game, 1);
    let state = bomb(&game);
    assert_eq!(state.stage, stage);
    assert_eq!(state.remaining_secs, remaining);
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::Off);

    wrong_code(&mut game);
    assert_eq!(bomb(&game).lock_remaining_secs, 60);
    advance_secs(&mut game, 60);
    assert_eq!(bomb(&game).stage, stage);

    wrong_code(&mut game);
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Ended);
    assert_eq!(state.outcome, Some(BombOutcome::TooManyAttempts));
    assert_eq!(
        state.outcome.map(BombOutcome::message),
        Some("too many failed attempts, placing team loses")
    );
    assert_eq!(game.audio().count(AudioCue::Defuse), 1);
    assert_eq!(game.leds().indicator(Indicator::Red), IndicatorState::On);
    assert_eq!(game.leds().strip(), StripState::Solid(LedColor::Red));
}

fn type_arm_code(game: &mut TestGame) {
    let code = bomb(game).arm_code.to_string();
    enter_code(game, &code);
}

#[test]
fn test_countdown_resumes_after_lockout() {
    let mut game = armed_easy_bomb();
    advance_secs(&mut game, 10);
    wrong_code(&mut game);
    assert!(!game.scheduler().is_pending(TimerKey::BombTick));

    advance_secs(&mut game, 30);
    assert_eq!(bomb(&game).stage, BombStage::Countdown);
    assert_eq!(bomb(&game).remaining_secs, 590);
    assert_eq!(
        game.leds().indicator(Indicator::Blue),
        IndicatorState::Blinking(Duration::from_millis(1_000))
    );

    advance_secs(&mut game, 5);
    assert_eq!(bomb(&game).remaining_secs, 585);
}

#[test]
fn test_successful_code_resets_attempts() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Easy);
    wrong_code(&mut game);
    advance_secs(&mut game, 30);
    assert_eq!(bomb(&game).failed_attempts, 1);

    enter_expected_code(&mut game);
    assert_eq!(bomb(&game).failed_attempts, 0);
    assert_eq!(bomb(&game).stage, BombStage::Countdown);
}

// ============================================================================
// Checkpoints
// ============================================================================

#[test]
fn test_medium_checkpoint_requires_new_arm_code() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Medium);
    let state = bomb(&game);
    assert_eq!(state.checkpoints.len(), 1);
    let checkpoint = state.checkpoints[0];
    let first_arm_code = state.arm_code.clone();

    enter_expected_code(&mut game);
    advance_secs(&mut game, u64::from(600 - checkpoint));

    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::AwaitReentry);
    assert_eq!(state.remaining_secs, checkpoint);
    assert!(state.checkpoints.is_empty());
    assert_ne!(state.arm_code, first_arm_code);
    assert_eq!(game.leds().indicator(Indicator::Blue), IndicatorState::On);
    assert!(!game.scheduler().is_pending(TimerKey::BombTick));

    advance_secs(&mut game, 100);
    assert_eq!(bomb(&game).remaining_secs, checkpoint);

    enter_expected_code(&mut game);
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Countdown);
    assert!(!state.beep_suppressed);
    assert_eq!(game.audio().count(AudioCue::Arm), 1);

    advance_secs(&mut game, 3);
    assert_eq!(bomb(&game).remaining_secs, checkpoint - 3);
}

#[test]
fn test_hard_checkpoints_are_distinct_and_descending() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Hard);
    let checkpoints = bomb(&game).checkpoints;
    assert_eq!(checkpoints.len(), 2);
    assert!(checkpoints[0] > checkpoints[1]);
    assert!(checkpoints.iter().all(|c| (180..=420).contains(c)));
}

#[test]
fn test_hard_two_checkpoints_then_time_runs_out() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Hard);
    game.card_presented();
    let checkpoints = bomb(&game).checkpoints;
    let (first, second) = (checkpoints[0], checkpoints[1]);

    enter_expected_code(&mut game);
    assert_eq!(bomb(&game).stage, BombStage::Countdown);

    advance_secs(&mut game, u64::from(600 - first));
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::AwaitReentry);
    assert_eq!(state.remaining_secs, first);
    assert_eq!(state.checkpoints.len(), 1);

    enter_expected_code(&mut game);
    assert_eq!(bomb(&game).stage, BombStage::Countdown);

    advance_secs(&mut game, u64::from(first - second));
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::AwaitReentry);
    assert_eq!(state.remaining_secs, second);
    assert!(state.checkpoints.is_empty());

    enter_expected_code(&mut game);
    assert_eq!(bomb(&game).stage, BombStage::Countdown);

    advance_secs(&mut game, u64::from(second));
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::Ended);
    assert_eq!(state.outcome, Some(BombOutcome::TimeElapsed));
    assert_eq!(game.audio().count(AudioCue::Arm), 2);
}

// ============================================================================
// NFC unlock
// ============================================================================

#[test]
fn test_hard_waits_for_card() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Hard);
    assert_eq!(bomb(&game).stage, BombStage::AwaitNfc);

    press(&mut game, '1');
    game.handle_input(Key::Confirm);
    game.handle_input(Key::Cancel);
    advance_secs(&mut game, 60);
    assert_eq!(bomb(&game).stage, BombStage::AwaitNfc);
    assert!(bomb(&game).input.is_empty());

    game.card_presented();
    assert_eq!(bomb(&game).stage, BombStage::AwaitCode);
}

#[test]
fn test_override_key_replaces_card() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Hard);
    press(&mut game, 'A');
    let state = bomb(&game);
    assert_eq!(state.stage, BombStage::AwaitCode);
    assert!(state.input.is_empty());
}

#[test]
fn test_auto_unlock_skips_card_step() {
    let config = GameConfig {
        hard_mode_auto_unlock: true,
        ..GameConfig::default()
    };
    let mut game = game_with(config, SEED);
    start_bomb(&mut game, Difficulty::Hard);
    assert_eq!(bomb(&game).stage, BombStage::AwaitCode);
}

#[test]
fn test_card_ignored_after_unlock() {
    let mut game = armed_easy_bomb();
    let before = bomb(&game);
    game.card_presented();
    assert_eq!(bomb(&game), before);
}

// ============================================================================
// Diagnostics and collaborator failures
// ============================================================================

#[test]
fn test_dev_skip_targets() {
    let mut game = armed_easy_bomb();
    let mut seen = Vec::new();
    for _ in 0..3 {
        game.handle_input(Key::DevSkip);
        seen.push(bomb(&game).remaining_secs);
    }
    assert_eq!(seen, vec![430, 250, 70]);
    assert!(!bomb(&game).beep_suppressed);

    advance_secs(&mut game, 10);
    assert_eq!(bomb(&game).remaining_secs, 60);
    game.handle_input(Key::DevSkip);
    assert_eq!(bomb(&game).remaining_secs, 10);
    assert_eq!(
        game.leds().indicator(Indicator::Blue),
        IndicatorState::Blinking(Duration::from_millis(250))
    );

    game.handle_input(Key::DevSkip);
    assert_eq!(bomb(&game).remaining_secs, 10);
}

#[test]
fn test_dev_skip_ignored_before_arming() {
    let mut game = new_game();
    start_bomb(&mut game, Difficulty::Easy);
    game.handle_input(Key::DevSkip);
    assert_eq!(bomb(&game).remaining_secs, 600);
}

#[test]
fn test_output_failures_do_not_stop_the_game() {
    let mut game = new_game();
    game.leds_mut().take_commands();
    game.leds_mut().set_failing(true);
    game.audio_mut().set_failing(true);

    start_bomb(&mut game, Difficulty::Easy);
    enter_expected_code(&mut game);
    advance_secs(&mut game, 600);

    assert_eq!(bomb(&game).outcome, Some(BombOutcome::TimeElapsed));
    assert!(game.leds().commands().is_empty());
    assert!(game.audio().played().is_empty());
}

#[test]
fn test_audio_disabled_plays_nothing() {
    let config = GameConfig {
        audio_enabled: false,
        ..GameConfig::default()
    };
    let mut game = game_with(config, SEED);
    start_bomb(&mut game, Difficulty::Easy);
    enter_expected_code(&mut game);
    advance_secs(&mut game, 610);

    assert_eq!(bomb(&game).outcome, Some(BombOutcome::TimeElapsed));
    assert!(game.audio().played().is_empty());
}
