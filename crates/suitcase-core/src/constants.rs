//! Game constants for the airsoft suitcase controller.
//!
//! These values are the defaults used by [`GameConfig`](crate::config::GameConfig).
//! Every timing threshold can be overridden through configuration; the
//! constants document the behavior of a stock prop.
//!
//! # Keypad Layout
//!
//! The physical keypad is a 4×4 matrix plus two side buttons:
//!
//! ```text
//! ┌───┬───┬───┬───┐
//! │ 1 │ 2 │ 3 │ A │
//! ├───┼───┼───┼───┤
//! │ 4 │ 5 │ 6 │ B │      (red)  ── cancel / team red
//! ├───┼───┼───┼───┤      (blue) ── confirm / team blue
//! │ 7 │ 8 │ 9 │ C │
//! ├───┼───┼───┼───┤
//! │ * │ 0 │ # │ D │
//! └───┴───┴───┴───┘
//! ```
//!
//! Codes are built only from the 14 symbols `0-9` and `A-D`. `*` and `#` are
//! gesture keys and never part of a code.
//!
//! # Usage
//!
//! ```
//! use suitcase_core::constants::*;
//!
//! assert_eq!(KEYPAD_ALPHABET.len(), 14);
//! assert_eq!(BOMB_CODE_LENGTH, 20);
//! assert!(CHECKPOINT_MIN_SECS < CHECKPOINT_MAX_SECS);
//! ```

// ============================================================================
// Keypad
// ============================================================================

/// Symbols a player can enter as part of a code.
pub const KEYPAD_ALPHABET: [char; 14] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D',
];

/// Symbol that substitutes for an NFC card while the bomb waits for one.
pub const NFC_OVERRIDE_SYMBOL: char = 'A';

/// Number of selectable entries on each menu level.
pub const MENU_OPTION_COUNT: usize = 3;

/// How long the menu key must be held during a game to force a return to the menu.
pub const MENU_HOLD_MS: u64 = 3_000;

// ============================================================================
// Bomb
// ============================================================================

/// Countdown length once the bomb is armed (10 minutes).
pub const BOMB_DURATION_SECS: u32 = 10 * 60;

/// Length of arm, re-entry and defuse codes.
pub const BOMB_CODE_LENGTH: usize = 20;

/// Lockout durations for the first and second wrong code.
///
/// A wrong code beyond the length of this sequence ends the game.
pub const BOMB_LOCKOUT_SECS: [u32; 2] = [30, 60];

/// Length of the arm sound; countdown beeps stay muted for this window.
pub const ARM_SOUND_MS: u64 = 2_600;

/// Remaining-time targets for the diagnostic skip key, highest first.
///
/// 7:10, 4:10, 1:10 and 0:10 sit just above each feedback tier boundary.
pub const BOMB_SKIP_TARGETS: [u32; 4] = [430, 250, 70, 10];

/// Lower bound (inclusive) for re-entry checkpoints.
pub const CHECKPOINT_MIN_SECS: u32 = 180;

/// Upper bound (inclusive) for re-entry checkpoints.
pub const CHECKPOINT_MAX_SECS: u32 = 420;

/// Blink period of the red indicator during a lockout.
pub const LOCKOUT_BLINK_MS: u64 = 250;

/// Countdown tick period.
pub const TICK_MS: u64 = 1_000;

// ============================================================================
// Bunker & Flag
// ============================================================================

/// Holding time a team needs to win the bunker.
pub const BUNKER_TARGET_SECS: u32 = 600;

/// Strip pulse period while a team holds the bunker.
pub const BUNKER_PULSE_MS: u64 = 280;

/// Repeat period of the acknowledge beep after a bunker winner exists.
pub const BUNKER_SIGNAL_MS: u64 = 220;

/// Strip pulse period while a team controls the flag.
pub const FLAG_PULSE_MS: u64 = 250;
