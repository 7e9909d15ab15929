//! Bomb mode.
//!
//! ```text
//! AwaitNfc ─► AwaitCode ─► Countdown ◄─► AwaitReentry
//!                 │            │              │
//!                 └────────► Locked ◄─────────┘   (resumes the prior stage)
//!
//! any stage except Ended ─► Ended
//! ```
//!
//! The arming team types the arm code to start a countdown; the defending
//! team types the defuse code to stop it. Medium and Hard pause the countdown
//! at random checkpoints until a fresh arm code is entered. Wrong codes lock
//! the keypad for a while; one wrong code too many ends the game.

use crate::effects::Effects;
use crate::scheduler::TimerKey;
use rand::Rng;
use rand::seq::index;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use suitcase_core::config::BombSettings;
use suitcase_core::constants::{NFC_OVERRIDE_SYMBOL, TICK_MS};
use suitcase_core::{AccessCode, CodeGenerator, Difficulty, Key, KeypadSymbol, Team};
use suitcase_hardware::AudioCue;
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(TICK_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BombStage {
    /// Hard only: waiting for a card or the override key.
    AwaitNfc,
    /// Waiting for the arm code.
    AwaitCode,
    Countdown,
    /// Countdown paused at a checkpoint, waiting for a fresh arm code.
    AwaitReentry,
    /// Keypad locked after a wrong code.
    Locked,
    Ended,
}

impl fmt::Display for BombStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BombStage::AwaitNfc => "await-nfc",
            BombStage::AwaitCode => "await-code",
            BombStage::Countdown => "countdown",
            BombStage::AwaitReentry => "await-reentry",
            BombStage::Locked => "locked",
            BombStage::Ended => "ended",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BombOutcome {
    TimeElapsed,
    Defused,
    TooManyAttempts,
}

impl BombOutcome {
    pub fn message(self) -> &'static str {
        match self {
            BombOutcome::TimeElapsed => "time elapsed, placing team wins",
            BombOutcome::Defused => "defused, placing team loses",
            BombOutcome::TooManyAttempts => "too many failed attempts, placing team loses",
        }
    }
}

impl fmt::Display for BombOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BombState {
    pub difficulty: Difficulty,
    pub stage: BombStage,
    pub arm_code: AccessCode,
    pub defuse_code: AccessCode,
    pub input: Vec<KeypadSymbol>,
    pub remaining_secs: u32,
    /// Pending re-entry checkpoints, highest first.
    pub checkpoints: Vec<u32>,
    pub failed_attempts: u8,
    pub lock_remaining_secs: u32,
    pub resume_stage: Option<BombStage>,
    pub outcome: Option<BombOutcome>,
    /// Inside the arm-sound window; countdown beeps are skipped.
    pub beep_suppressed: bool,
    /// Beeps still due in the current countdown second.
    pub pending_beeps: u8,
}

impl BombState {
    /// Enter bomb mode.
    pub fn start<R: Rng>(
        difficulty: Difficulty,
        auto_unlock: bool,
        settings: &BombSettings,
        codes: &mut CodeGenerator<R>,
        effects: &mut Effects,
    ) -> Self {
        let stage = if difficulty == Difficulty::Hard && !auto_unlock {
            BombStage::AwaitNfc
        } else {
            BombStage::AwaitCode
        };
        let length = code_length(settings);
        let arm_code = codes.generate(length);
        let defuse_code = codes.generate(length);
        let checkpoints = draw_checkpoints(difficulty.checkpoint_count(), settings, codes.rng_mut());
        info!(%difficulty, %stage, ?checkpoints, "bomb started");

        effects.bomb_idle();
        Self {
            difficulty,
            stage,
            arm_code,
            defuse_code,
            input: Vec::with_capacity(settings.code_length),
            remaining_secs: settings.duration_secs,
            checkpoints,
            failed_attempts: 0,
            lock_remaining_secs: 0,
            resume_stage: None,
            outcome: None,
            beep_suppressed: false,
            pending_beeps: 0,
        }
    }

    /// Code the current stage validates against, if any.
    pub fn expected_code(&self) -> Option<&AccessCode> {
        match self.stage {
            BombStage::AwaitCode | BombStage::AwaitReentry => Some(&self.arm_code),
            BombStage::Countdown => Some(&self.defuse_code),
            _ => None,
        }
    }

    pub fn input_text(&self) -> String {
        self.input.iter().map(|s| s.as_char()).collect()
    }

    pub fn is_ended(&self) -> bool {
        self.stage == BombStage::Ended
    }

    pub fn handle_key(&mut self, key: Key, settings: &BombSettings, effects: &mut Effects) {
        match self.stage {
            BombStage::Ended | BombStage::Locked => {}
            BombStage::AwaitNfc => {
                if key.as_symbol().map(KeypadSymbol::as_char) == Some(NFC_OVERRIDE_SYMBOL) {
                    debug!("nfc override key");
                    self.unlock();
                }
            }
            BombStage::AwaitCode | BombStage::AwaitReentry | BombStage::Countdown => match key {
                Key::DevSkip if self.stage == BombStage::Countdown => {
                    self.dev_skip(settings, effects);
                }
                Key::Cancel => self.input.clear(),
                Key::Confirm => self.confirm(settings, effects),
                Key::Symbol(symbol) => {
                    if self.input.len() < settings.code_length {
                        self.input.push(symbol);
                    }
                }
                _ => {}
            },
        }
    }

    /// A card was read. Only meaningful while waiting for one.
    pub fn card_presented(&mut self) {
        if self.stage == BombStage::AwaitNfc {
            info!("card accepted");
            self.unlock();
        }
    }

    pub fn on_timer<R: Rng>(
        &mut self,
        key: TimerKey,
        settings: &BombSettings,
        codes: &mut CodeGenerator<R>,
        effects: &mut Effects,
    ) {
        match key {
            TimerKey::BombTick => self.tick(settings, codes, effects),
            TimerKey::BombLockTick => self.lock_tick(settings, effects),
            TimerKey::BombBeep => self.beep(settings, effects),
            TimerKey::BeepSuppression => self.beep_suppressed = false,
            TimerKey::GameEnd => {
                effects.cue(AudioCue::Boom);
            }
            other => debug!(key = %other, "timer not handled by bomb mode"),
        }
    }

    fn unlock(&mut self) {
        self.stage = BombStage::AwaitCode;
        self.input.clear();
        self.failed_attempts = 0;
    }

    fn confirm(&mut self, settings: &BombSettings, effects: &mut Effects) {
        if self.input.is_empty() {
            return;
        }
        let entered = std::mem::take(&mut self.input);

        if self.stage == BombStage::Countdown {
            if self.defuse_code.matches(&entered) {
                self.finish(BombOutcome::Defused, settings, effects);
            } else {
                self.wrong_code(settings, effects);
            }
            return;
        }

        if !self.arm_code.matches(&entered) {
            self.wrong_code(settings, effects);
            return;
        }

        self.failed_attempts = 0;
        if self.stage == BombStage::AwaitCode {
            info!("bomb armed");
            self.beep_suppressed = true;
            effects
                .cue(AudioCue::Arm)
                .schedule(TimerKey::BeepSuppression, settings.arm_sound());
        } else {
            info!(remaining = self.remaining_secs, "countdown resumed");
        }
        self.enter_countdown(settings, effects);
    }

    fn enter_countdown(&mut self, settings: &BombSettings, effects: &mut Effects) {
        self.stage = BombStage::Countdown;
        self.input.clear();
        effects
            .countdown(settings.tier_for(self.remaining_secs))
            .schedule(TimerKey::BombTick, TICK);
    }

    fn tick<R: Rng>(
        &mut self,
        settings: &BombSettings,
        codes: &mut CodeGenerator<R>,
        effects: &mut Effects,
    ) {
        if self.stage != BombStage::Countdown {
            return;
        }
        let previous = self.remaining_secs;
        self.remaining_secs = previous.saturating_sub(1);
        debug!(remaining = self.remaining_secs, "tick");

        if self.remaining_secs == 0 {
            self.finish(BombOutcome::TimeElapsed, settings, effects);
            return;
        }

        if self.checkpoints.first() == Some(&self.remaining_secs) {
            self.checkpoints.remove(0);
            self.stage = BombStage::AwaitReentry;
            self.arm_code = codes.generate(code_length(settings));
            self.input.clear();
            self.failed_attempts = 0;
            self.pending_beeps = 0;
            info!(remaining = self.remaining_secs, "checkpoint reached, new arm code required");
            effects.cancel(TimerKey::BombBeep).bomb_idle();
            return;
        }

        let tier = settings.tier_for(self.remaining_secs);
        if tier != settings.tier_for(previous) {
            debug!(remaining = self.remaining_secs, beeps = tier.beeps_per_second, "feedback tier changed");
            effects.retune(tier);
        }
        if !self.beep_suppressed {
            effects.cue(AudioCue::Beep);
            self.pending_beeps = tier.beeps_per_second.saturating_sub(1);
            if self.pending_beeps > 0 {
                effects.schedule(TimerKey::BombBeep, tier.beep_interval());
            }
        }
        effects.schedule(TimerKey::BombTick, TICK);
    }

    fn beep(&mut self, settings: &BombSettings, effects: &mut Effects) {
        if self.stage != BombStage::Countdown || self.pending_beeps == 0 {
            return;
        }
        self.pending_beeps -= 1;
        effects.cue(AudioCue::Beep);
        if self.pending_beeps > 0 {
            let interval = settings.tier_for(self.remaining_secs).beep_interval();
            effects.schedule(TimerKey::BombBeep, interval);
        }
    }

    fn wrong_code(&mut self, settings: &BombSettings, effects: &mut Effects) {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        let Some(lockout) = settings.lockout_for(self.failed_attempts) else {
            self.finish(BombOutcome::TooManyAttempts, settings, effects);
            return;
        };

        info!(attempts = self.failed_attempts, ?lockout, from = %self.stage, "wrong code, keypad locked");
        self.resume_stage = Some(self.stage);
        self.stage = BombStage::Locked;
        self.lock_remaining_secs = u32::try_from(lockout.as_secs()).unwrap_or(u32::MAX);
        self.input.clear();
        self.pending_beeps = 0;
        effects
            .cancel(TimerKey::BombTick)
            .cancel(TimerKey::BombBeep)
            .lockout(settings.lockout_blink())
            .schedule(TimerKey::BombLockTick, TICK);
    }

    fn lock_tick(&mut self, settings: &BombSettings, effects: &mut Effects) {
        if self.stage != BombStage::Locked {
            return;
        }
        self.lock_remaining_secs = self.lock_remaining_secs.saturating_sub(1);
        if self.lock_remaining_secs > 0 {
            effects.schedule(TimerKey::BombLockTick, TICK);
            return;
        }

        let resume = self.resume_stage.take().unwrap_or(BombStage::AwaitCode);
        info!(stage = %resume, "keypad unlocked");
        self.input.clear();
        if resume == BombStage::Countdown {
            self.enter_countdown(settings, effects);
        } else {
            self.stage = resume;
            effects.bomb_idle();
        }
    }

    fn dev_skip(&mut self, settings: &BombSettings, effects: &mut Effects) {
        let Some(target) = settings.skip_target_below(self.remaining_secs) else {
            return;
        };
        debug!(from = self.remaining_secs, to = target, "dev skip");
        self.remaining_secs = target;
        // Checkpoints at or above the new time can no longer be reached.
        self.checkpoints.retain(|&checkpoint| checkpoint < target);
        self.beep_suppressed = false;
        effects
            .cancel(TimerKey::BeepSuppression)
            .retune(settings.tier_for(target));
    }

    fn finish(&mut self, outcome: BombOutcome, settings: &BombSettings, effects: &mut Effects) {
        info!(%outcome, remaining = self.remaining_secs, "bomb ended");
        self.stage = BombStage::Ended;
        self.outcome = Some(outcome);
        self.input.clear();
        self.pending_beeps = 0;
        self.resume_stage = None;
        effects
            .cancel(TimerKey::BombTick)
            .cancel(TimerKey::BombLockTick)
            .cancel(TimerKey::BombBeep)
            .cancel(TimerKey::BeepSuppression);
        match outcome {
            BombOutcome::TimeElapsed => {
                effects
                    .red_only()
                    .cue(AudioCue::Arm)
                    .schedule(TimerKey::GameEnd, settings.arm_sound());
            }
            BombOutcome::Defused => {
                effects.team_static(Team::Blue).cue(AudioCue::Defuse);
            }
            BombOutcome::TooManyAttempts => {
                effects.team_static(Team::Red).cue(AudioCue::Defuse);
            }
        }
    }
}

fn code_length(settings: &BombSettings) -> i32 {
    i32::try_from(settings.code_length).unwrap_or(i32::MAX)
}

/// Draw `count` distinct checkpoints from the configured window, highest first.
pub fn draw_checkpoints<R: Rng + ?Sized>(
    count: usize,
    settings: &BombSettings,
    rng: &mut R,
) -> Vec<u32> {
    if count == 0 || settings.checkpoint_min_secs > settings.checkpoint_max_secs {
        return Vec::new();
    }
    let span = (settings.checkpoint_max_secs - settings.checkpoint_min_secs) as usize + 1;
    let mut checkpoints: Vec<u32> = index::sample(rng, span, count.min(span))
        .into_iter()
        .map(|offset| settings.checkpoint_min_secs + offset as u32)
        .collect();
    checkpoints.sort_unstable_by(|a, b| b.cmp(a));
    checkpoints
}
