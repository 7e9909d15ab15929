//! Side effects requested by game transitions.
//!
//! Mode handlers never touch hardware or timers directly. They push
//! [`Effect`]s onto an [`Effects`] list which the controller interprets in
//! order once the transition has finished.
//!
//! ```
//! use std::time::Duration;
//! use suitcase_core::Team;
//! use suitcase_game::effects::{Effect, Effects};
//! use suitcase_game::scheduler::TimerKey;
//! use suitcase_hardware::AudioCue;
//!
//! let mut effects = Effects::new();
//! effects
//!     .team_pulse(Team::Blue, Duration::from_millis(250))
//!     .cue(AudioCue::Beep)
//!     .schedule(TimerKey::BunkerTick, Duration::from_secs(1));
//!
//! assert!(effects.iter().any(|e| matches!(e, Effect::Cue(AudioCue::Beep))));
//! ```

use crate::scheduler::TimerKey;
use std::time::Duration;
use suitcase_core::Team;
use suitcase_core::config::FeedbackTier;
use suitcase_hardware::{AudioCue, Indicator, LedColor, LedCommand};

const INDICATORS: [Indicator; 2] = [Indicator::Red, Indicator::Blue];

/// One side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Led(LedCommand),
    Cue(AudioCue),
    Schedule(TimerKey, Duration),
    Cancel(TimerKey),
    /// Leave the current game. Effects after this one are dropped.
    ReturnToMenu,
}

/// Ordered list of effects with helpers for the recurring LED patterns.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Effects {
    items: Vec<Effect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: Effect) -> &mut Self {
        self.items.push(effect);
        self
    }

    pub fn led(&mut self, command: LedCommand) -> &mut Self {
        self.push(Effect::Led(command))
    }

    pub fn cue(&mut self, cue: AudioCue) -> &mut Self {
        self.push(Effect::Cue(cue))
    }

    pub fn schedule(&mut self, key: TimerKey, delay: Duration) -> &mut Self {
        self.push(Effect::Schedule(key, delay))
    }

    pub fn cancel(&mut self, key: TimerKey) -> &mut Self {
        self.push(Effect::Cancel(key))
    }

    pub fn return_to_menu(&mut self) -> &mut Self {
        self.push(Effect::ReturnToMenu)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Effect> {
        self.items.iter()
    }

    /// Stop every LED effect and switch everything off.
    pub fn reset_leds(&mut self) -> &mut Self {
        for indicator in INDICATORS {
            self.led(LedCommand::StopBlink(indicator));
        }
        self.led(LedCommand::StopPulse);
        for indicator in INDICATORS {
            self.led(LedCommand::SetIndicator { indicator, on: false });
        }
        self.led(LedCommand::FillStrip(LedColor::Off))
    }

    /// Menu idle: both indicators solid, strip dark.
    pub fn menu_idle(&mut self) -> &mut Self {
        self.reset_leds();
        for indicator in INDICATORS {
            self.led(LedCommand::SetIndicator { indicator, on: true });
        }
        self
    }

    /// Bomb waiting for a code: blue solid only.
    pub fn bomb_idle(&mut self) -> &mut Self {
        self.reset_leds().led(LedCommand::SetIndicator {
            indicator: Indicator::Blue,
            on: true,
        })
    }

    /// Countdown feedback from scratch: blue blink and green strip pulse.
    pub fn countdown(&mut self, tier: &FeedbackTier) -> &mut Self {
        self.reset_leds()
            .led(LedCommand::StartBlink {
                indicator: Indicator::Blue,
                period: tier.blink_period(),
            })
            .led(LedCommand::StartPulse {
                color: LedColor::Green,
                period: tier.pulse_period(),
            })
    }

    /// Retune running countdown feedback to another tier.
    pub fn retune(&mut self, tier: &FeedbackTier) -> &mut Self {
        self.led(LedCommand::SetBlinkPeriod {
            indicator: Indicator::Blue,
            period: tier.blink_period(),
        })
        .led(LedCommand::SetPulsePeriod(tier.pulse_period()))
    }

    /// Lockout: everything off except a blinking red indicator.
    pub fn lockout(&mut self, period: Duration) -> &mut Self {
        self.reset_leds().led(LedCommand::StartBlink {
            indicator: Indicator::Red,
            period,
        })
    }

    /// Team holding the objective: team indicator on, strip pulsing in the
    /// team color.
    pub fn team_pulse(&mut self, team: Team, period: Duration) -> &mut Self {
        self.reset_leds()
            .led(LedCommand::SetIndicator {
                indicator: team.into(),
                on: true,
            })
            .led(LedCommand::StartPulse {
                color: team.into(),
                period,
            })
    }

    /// Final result: team indicator solid, strip solid in the team color.
    pub fn team_static(&mut self, team: Team) -> &mut Self {
        self.reset_leds()
            .led(LedCommand::SetIndicator {
                indicator: team.into(),
                on: true,
            })
            .led(LedCommand::FillStrip(team.into()))
    }

    /// Red indicator alone, strip dark.
    pub fn red_only(&mut self) -> &mut Self {
        self.reset_leds().led(LedCommand::SetIndicator {
            indicator: Indicator::Red,
            on: true,
        })
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Effects {
    type Item = &'a Effect;
    type IntoIter = std::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
