//! Typed game configuration.
//!
//! [`GameConfig::default`] reproduces the stock prop. Field values can be
//! overridden from any serde source; [`GameConfig::validate`] must pass before
//! a configuration is handed to the controller.
//!
//! ```
//! use suitcase_core::config::GameConfig;
//!
//! let config = GameConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.bomb.tier_for(600).beeps_per_second, 1);
//! assert_eq!(config.bomb.tier_for(60).beeps_per_second, 4);
//! ```

use crate::constants::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration consumed by the game controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play audio cues. When disabled no cue reaches the audio output.
    pub audio_enabled: bool,

    /// Skip the NFC card step on Hard difficulty.
    pub hard_mode_auto_unlock: bool,

    /// How long the menu key must be held during a game (milliseconds).
    pub menu_hold_ms: u64,

    pub bomb: BombSettings,
    pub bunker: BunkerSettings,
    pub flag: FlagSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            hard_mode_auto_unlock: false,
            menu_hold_ms: MENU_HOLD_MS,
            bomb: BombSettings::default(),
            bunker: BunkerSettings::default(),
            flag: FlagSettings::default(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn menu_hold(&self) -> Duration {
        Duration::from_millis(self.menu_hold_ms)
    }

    /// Check the configuration for settings the game logic cannot honor.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        self.bomb.validate()?;
        if self.bunker.target_secs == 0 {
            return Err(Error::config("bunker target must be positive"));
        }
        if self.bunker.signal_period_ms == 0 {
            return Err(Error::config("bunker signal period must be positive"));
        }
        Ok(())
    }
}

/// Feedback rates for one band of remaining countdown time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackTier {
    /// Upper bound (inclusive) of remaining seconds this tier applies to.
    pub max_remaining_secs: u32,
    /// Blue indicator blink period.
    pub blink_period_ms: u64,
    /// Strip pulse period.
    pub pulse_period_ms: u64,
    /// Evenly spaced beeps per countdown second.
    pub beeps_per_second: u8,
}

impl FeedbackTier {
    #[must_use]
    pub fn blink_period(&self) -> Duration {
        Duration::from_millis(self.blink_period_ms)
    }

    #[must_use]
    pub fn pulse_period(&self) -> Duration {
        Duration::from_millis(self.pulse_period_ms)
    }

    /// Gap between consecutive beeps inside one second.
    #[must_use]
    pub fn beep_interval(&self) -> Duration {
        Duration::from_millis(TICK_MS / u64::from(self.beeps_per_second.max(1)))
    }
}

/// Bomb mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombSettings {
    pub duration_secs: u32,
    pub code_length: usize,
    /// Lockout per wrong code; one more wrong code than entries ends the game.
    pub lockout_secs: Vec<u32>,
    pub arm_sound_ms: u64,
    /// Diagnostic skip targets, highest first.
    pub skip_targets: Vec<u32>,
    pub checkpoint_min_secs: u32,
    pub checkpoint_max_secs: u32,
    pub lockout_blink_ms: u64,
    /// Urgent tiers, sorted by ascending `max_remaining_secs`.
    pub tiers: Vec<FeedbackTier>,
    /// Rates used above the last tier.
    pub calm_tier: FeedbackTier,
}

impl Default for BombSettings {
    fn default() -> Self {
        Self {
            duration_secs: BOMB_DURATION_SECS,
            code_length: BOMB_CODE_LENGTH,
            lockout_secs: BOMB_LOCKOUT_SECS.to_vec(),
            arm_sound_ms: ARM_SOUND_MS,
            skip_targets: BOMB_SKIP_TARGETS.to_vec(),
            checkpoint_min_secs: CHECKPOINT_MIN_SECS,
            checkpoint_max_secs: CHECKPOINT_MAX_SECS,
            lockout_blink_ms: LOCKOUT_BLINK_MS,
            tiers: vec![
                FeedbackTier {
                    max_remaining_secs: 60,
                    blink_period_ms: 250,
                    pulse_period_ms: 50,
                    beeps_per_second: 4,
                },
                FeedbackTier {
                    max_remaining_secs: 240,
                    blink_period_ms: 333,
                    pulse_period_ms: 100,
                    beeps_per_second: 3,
                },
                FeedbackTier {
                    max_remaining_secs: 420,
                    blink_period_ms: 500,
                    pulse_period_ms: 100,
                    beeps_per_second: 2,
                },
            ],
            calm_tier: FeedbackTier {
                max_remaining_secs: u32::MAX,
                blink_period_ms: 1_000,
                pulse_period_ms: 160,
                beeps_per_second: 1,
            },
        }
    }
}

impl BombSettings {
    /// Feedback tier for the given remaining time.
    #[must_use]
    pub fn tier_for(&self, remaining_secs: u32) -> &FeedbackTier {
        self.tiers
            .iter()
            .find(|tier| remaining_secs <= tier.max_remaining_secs)
            .unwrap_or(&self.calm_tier)
    }

    /// First skip target strictly below the current remaining time.
    #[must_use]
    pub fn skip_target_below(&self, remaining_secs: u32) -> Option<u32> {
        self.skip_targets
            .iter()
            .copied()
            .find(|&target| target < remaining_secs)
    }

    /// Lockout for the given failure count (1-based); `None` means game over.
    #[must_use]
    pub fn lockout_for(&self, failed_attempts: u8) -> Option<Duration> {
        let index = usize::from(failed_attempts).checked_sub(1)?;
        self.lockout_secs
            .get(index)
            .map(|&secs| Duration::from_secs(u64::from(secs)))
    }

    #[must_use]
    pub fn arm_sound(&self) -> Duration {
        Duration::from_millis(self.arm_sound_ms)
    }

    #[must_use]
    pub fn lockout_blink(&self) -> Duration {
        Duration::from_millis(self.lockout_blink_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.duration_secs == 0 {
            return Err(Error::config("bomb duration must be positive"));
        }
        if self.code_length == 0 || i32::try_from(self.code_length).is_err() {
            return Err(Error::config("bomb code length out of range"));
        }
        if self.lockout_secs.is_empty() || self.lockout_secs.contains(&0) {
            return Err(Error::config("lockout sequence must hold positive durations"));
        }
        if self.checkpoint_min_secs > self.checkpoint_max_secs {
            return Err(Error::config("checkpoint window is inverted"));
        }
        if self.checkpoint_min_secs == self.checkpoint_max_secs {
            return Err(Error::config(
                "checkpoint window too narrow for two distinct checkpoints",
            ));
        }
        if self.checkpoint_max_secs >= self.duration_secs {
            return Err(Error::config("checkpoints must fall inside the countdown"));
        }
        if !self
            .tiers
            .windows(2)
            .all(|w| w[0].max_remaining_secs < w[1].max_remaining_secs)
        {
            return Err(Error::config("feedback tiers must be sorted ascending"));
        }
        if self
            .tiers
            .iter()
            .chain(std::iter::once(&self.calm_tier))
            .any(|tier| tier.beeps_per_second == 0 || tier.blink_period_ms == 0)
        {
            return Err(Error::config("feedback tiers need a beep and a blink period"));
        }
        Ok(())
    }
}

/// Bunker mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BunkerSettings {
    pub target_secs: u32,
    pub pulse_period_ms: u64,
    pub signal_period_ms: u64,
}

impl Default for BunkerSettings {
    fn default() -> Self {
        Self {
            target_secs: BUNKER_TARGET_SECS,
            pulse_period_ms: BUNKER_PULSE_MS,
            signal_period_ms: BUNKER_SIGNAL_MS,
        }
    }
}

impl BunkerSettings {
    #[must_use]
    pub fn pulse_period(&self) -> Duration {
        Duration::from_millis(self.pulse_period_ms)
    }

    #[must_use]
    pub fn signal_period(&self) -> Duration {
        Duration::from_millis(self.signal_period_ms)
    }
}

/// Flag mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagSettings {
    pub pulse_period_ms: u64,
}

impl Default for FlagSettings {
    fn default() -> Self {
        Self {
            pulse_period_ms: FLAG_PULSE_MS,
        }
    }
}

impl FlagSettings {
    #[must_use]
    pub fn pulse_period(&self) -> Duration {
        Duration::from_millis(self.pulse_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(600, 1_000, 160, 1)]
    #[case(421, 1_000, 160, 1)]
    #[case(420, 500, 100, 2)]
    #[case(241, 500, 100, 2)]
    #[case(240, 333, 100, 3)]
    #[case(61, 333, 100, 3)]
    #[case(60, 250, 50, 4)]
    #[case(1, 250, 50, 4)]
    fn test_tier_boundaries(
        #[case] remaining: u32,
        #[case] blink_ms: u64,
        #[case] pulse_ms: u64,
        #[case] beeps: u8,
    ) {
        let settings = BombSettings::default();
        let tier = settings.tier_for(remaining);
        assert_eq!(tier.blink_period_ms, blink_ms);
        assert_eq!(tier.pulse_period_ms, pulse_ms);
        assert_eq!(tier.beeps_per_second, beeps);
    }

    #[rstest]
    #[case(600, Some(430))]
    #[case(500, Some(430))]
    #[case(430, Some(250))]
    #[case(250, Some(70))]
    #[case(60, Some(10))]
    #[case(10, None)]
    #[case(3, None)]
    fn test_skip_target_below(#[case] remaining: u32, #[case] expected: Option<u32>) {
        assert_eq!(BombSettings::default().skip_target_below(remaining), expected);
    }

    #[test]
    fn test_lockout_sequence() {
        let settings = BombSettings::default();
        assert_eq!(settings.lockout_for(0), None);
        assert_eq!(settings.lockout_for(1), Some(Duration::from_secs(30)));
        assert_eq!(settings.lockout_for(2), Some(Duration::from_secs(60)));
        assert_eq!(settings.lockout_for(3), None);
    }

    #[test]
    fn test_beep_interval() {
        let settings = BombSettings::default();
        assert_eq!(settings.tier_for(30).beep_interval(), Duration::from_millis(250));
        assert_eq!(settings.tier_for(200).beep_interval(), Duration::from_millis(333));
        assert_eq!(settings.tier_for(500).beep_interval(), Duration::from_millis(1_000));
    }

    #[test]
    fn test_default_validates() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unsorted_tiers() {
        let mut config = GameConfig::default();
        config.bomb.tiers.swap(0, 2);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut config = GameConfig::default();
        config.bomb.checkpoint_min_secs = 500;
        config.bomb.checkpoint_max_secs = 400;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_lockouts() {
        let mut config = GameConfig::default();
        config.bomb.lockout_secs.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"audio_enabled": false, "bunker": {"target_secs": 120}}"#)
                .unwrap();

        assert!(!config.audio_enabled);
        assert_eq!(config.bunker.target_secs, 120);
        assert_eq!(config.bunker.signal_period_ms, BUNKER_SIGNAL_MS);
        assert_eq!(config.bomb, BombSettings::default());
    }
}
