//! Bunker mode: king of the hill with one clock per team.
//!
//! Only the team holding the bunker accumulates time. The first team to reach
//! the target wins and the clocks freeze. Holding the signal key afterwards
//! beeps until it is released, which returns to the menu.

use crate::effects::Effects;
use crate::scheduler::TimerKey;
use serde::Serialize;
use std::time::Duration;
use suitcase_core::config::BunkerSettings;
use suitcase_core::constants::TICK_MS;
use suitcase_core::{Key, Team};
use suitcase_hardware::AudioCue;
use tracing::{debug, info};

const TICK: Duration = Duration::from_millis(TICK_MS);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BunkerState {
    pub red_secs: u32,
    pub blue_secs: u32,
    pub active_team: Option<Team>,
    pub winner: Option<Team>,
    pub signal_active: bool,
}

impl BunkerState {
    pub fn start(effects: &mut Effects) -> Self {
        info!("bunker started");
        effects.reset_leds().schedule(TimerKey::BunkerTick, TICK);
        Self::default()
    }

    pub fn seconds(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red_secs,
            Team::Blue => self.blue_secs,
        }
    }

    pub fn handle_key(&mut self, key: Key, settings: &BunkerSettings, effects: &mut Effects) {
        match key {
            Key::Cancel => self.take(Team::Red, settings, effects),
            Key::Confirm => self.take(Team::Blue, settings, effects),
            Key::SignalStart if self.winner.is_some() && !self.signal_active => {
                debug!("signal started");
                self.signal_active = true;
                effects.schedule(TimerKey::BunkerSignal, settings.signal_period());
            }
            Key::SignalEnd if self.signal_active => {
                debug!("signal released");
                self.signal_active = false;
                effects
                    .cancel(TimerKey::BunkerSignal)
                    .return_to_menu();
            }
            _ => {}
        }
    }

    pub fn on_timer(&mut self, key: TimerKey, settings: &BunkerSettings, effects: &mut Effects) {
        match key {
            TimerKey::BunkerTick => self.tick(settings, effects),
            TimerKey::BunkerSignal => {
                if self.signal_active {
                    effects
                        .cue(AudioCue::Beep)
                        .schedule(TimerKey::BunkerSignal, settings.signal_period());
                }
            }
            other => debug!(key = %other, "timer not handled by bunker mode"),
        }
    }

    fn take(&mut self, team: Team, settings: &BunkerSettings, effects: &mut Effects) {
        if self.winner.is_some() {
            return;
        }
        if self.active_team != Some(team) {
            info!(%team, "bunker taken");
        }
        self.active_team = Some(team);
        effects.team_pulse(team, settings.pulse_period());
    }

    fn tick(&mut self, settings: &BunkerSettings, effects: &mut Effects) {
        if self.winner.is_some() {
            return;
        }
        if let Some(team) = self.active_team {
            let secs = match team {
                Team::Red => &mut self.red_secs,
                Team::Blue => &mut self.blue_secs,
            };
            *secs = secs.saturating_add(1);
            if *secs >= settings.target_secs {
                info!(%team, "bunker held long enough, team wins");
                self.winner = Some(team);
                return;
            }
        }
        effects.schedule(TimerKey::BunkerTick, TICK);
    }
}
