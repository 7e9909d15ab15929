//! Flag mode: shows which team holds the flag. No timers, no winner.

use crate::effects::Effects;
use serde::Serialize;
use suitcase_core::config::FlagSettings;
use suitcase_core::{Key, Team};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlagState {
    pub controlling_team: Option<Team>,
}

impl FlagState {
    pub fn start(effects: &mut Effects) -> Self {
        info!("flag started");
        effects.reset_leds();
        Self::default()
    }

    pub fn handle_key(&mut self, key: Key, settings: &FlagSettings, effects: &mut Effects) {
        let team = match key {
            Key::Cancel => Team::Red,
            Key::Confirm => Team::Blue,
            _ => return,
        };
        info!(%team, "flag captured");
        self.controlling_team = Some(team);
        effects.team_pulse(team, settings.pulse_period());
    }
}
