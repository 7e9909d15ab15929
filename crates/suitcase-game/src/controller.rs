//! The game controller.
//!
//! [`GameController`] owns the session: the active [`Mode`], the timer
//! [`Scheduler`], the code generator and the two output collaborators. It
//! reacts to exactly two kinds of stimulus, an input
//! ([`handle_input`](GameController::handle_input),
//! [`card_presented`](GameController::card_presented)) or time passing
//! ([`advance`](GameController::advance)), and every reaction runs to
//! completion before the next one starts.
//!
//! Mode handlers return [`Effects`]; the controller interprets them in order.
//! LED and audio failures are logged and never change game state.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use suitcase_core::{Key, Phase};
//! use suitcase_game::GameController;
//! use suitcase_hardware::mock::{MockAudio, MockLed};
//!
//! let mut game = GameController::builder(MockLed::new(), MockAudio::new())
//!     .with_seed(7)
//!     .build()
//!     .unwrap();
//!
//! game.handle_input(Key::symbol('3').unwrap());
//! game.handle_input(Key::Confirm);
//! assert_eq!(game.phase(), Phase::Flag);
//!
//! game.handle_input(Key::MenuHoldStart);
//! game.advance(Duration::from_secs(3));
//! assert_eq!(game.phase(), Phase::Menu);
//! ```

use crate::bomb::BombState;
use crate::bunker::BunkerState;
use crate::effects::{Effect, Effects};
use crate::flag::FlagState;
use crate::menu::MenuAction;
use crate::scheduler::{Scheduler, TimerKey};
use crate::snapshot::{GameSnapshot, Mode};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use suitcase_core::{CodeGenerator, Difficulty, GameConfig, GameKind, InputEvent, Key, Phase};
use suitcase_hardware::{AudioCue, AudioSignaler, LedSignaler};
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

/// Maximum number of phase transitions kept for diagnostics.
const MAX_HISTORY_SIZE: usize = 100;

/// One change of the active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Controller time of the change.
    pub at: Duration,
}

pub struct GameController<L, A> {
    config: GameConfig,
    mode: Mode,
    scheduler: Scheduler,
    codes: CodeGenerator,
    leds: L,
    audio: A,
    menu_key_held: bool,
    nfc_available: bool,
    history: VecDeque<PhaseTransition>,
    updates: watch::Sender<GameSnapshot>,
}

impl<L, A> std::fmt::Debug for GameController<L, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("mode", &self.mode)
            .field("scheduler", &self.scheduler)
            .field("menu_key_held", &self.menu_key_held)
            .field("nfc_available", &self.nfc_available)
            .finish_non_exhaustive()
    }
}

impl<L: LedSignaler, A: AudioSignaler> GameController<L, A> {
    pub fn builder(leds: L, audio: A) -> GameControllerBuilder<L, A> {
        GameControllerBuilder::new(leds, audio)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn phase(&self) -> Phase {
        self.mode.phase()
    }

    /// Current controller time.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the next timer fires, if any is pending.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn leds(&self) -> &L {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut L {
        &mut self.leds
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn is_menu_key_held(&self) -> bool {
        self.menu_key_held
    }

    /// Recent phase transitions, oldest first.
    pub fn history(&self) -> &VecDeque<PhaseTransition> {
        &self.history
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.updates.borrow().clone()
    }

    /// Receiver notified after every change.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.updates.subscribe()
    }

    pub fn set_nfc_available(&mut self, available: bool) {
        self.nfc_available = available;
        self.publish();
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::Key(key) => self.handle_input(key),
            InputEvent::CardPresented => self.card_presented(),
        }
    }

    /// Feed one logical key. Keys that mean nothing in the current state are
    /// ignored.
    pub fn handle_input(&mut self, key: Key) {
        trace!(%key, phase = %self.phase(), "input");
        let mut effects = Effects::new();
        match key {
            Key::MenuHoldStart => {
                self.menu_key_held = true;
                if self.phase() != Phase::Menu {
                    effects.schedule(TimerKey::MenuHold, self.config.menu_hold());
                }
            }
            Key::MenuHoldEnd => {
                self.menu_key_held = false;
                effects.cancel(TimerKey::MenuHold);
            }
            _ => self.dispatch_key(key, &mut effects),
        }
        self.apply(effects);
        self.publish();
    }

    /// A card was read by the NFC reader.
    pub fn card_presented(&mut self) {
        match &mut self.mode {
            Mode::Bomb(bomb) => bomb.card_presented(),
            _ => debug!("card ignored outside bomb mode"),
        }
        self.publish();
    }

    /// Let `elapsed` pass, firing every timer that falls due in deadline
    /// order.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.scheduler.now().saturating_add(elapsed);
        self.advance_to(target);
    }

    /// Advance the clock to `time`. Earlier times are ignored.
    pub fn advance_to(&mut self, time: Duration) {
        while let Some(key) = self.scheduler.pop_due(time) {
            self.fire(key);
        }
        self.scheduler.advance_clock(time);
    }

    /// Abandon whatever is running and show the menu.
    pub fn reset_to_menu(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        info!(cancelled, "returning to menu");
        self.menu_key_held = false;
        self.enter(Mode::default());

        let mut effects = Effects::new();
        effects.menu_idle();
        self.apply(effects);
        self.publish();
    }

    /// Tear the controller apart, returning the output collaborators.
    pub fn into_parts(self) -> (L, A) {
        (self.leds, self.audio)
    }

    fn dispatch_key(&mut self, key: Key, effects: &mut Effects) {
        match &mut self.mode {
            Mode::Menu(menu) => {
                if let MenuAction::Start(game, difficulty) = menu.handle_key(key) {
                    self.start_game(game, difficulty, effects);
                }
            }
            Mode::Bomb(bomb) => bomb.handle_key(key, &self.config.bomb, effects),
            Mode::Bunker(bunker) => bunker.handle_key(key, &self.config.bunker, effects),
            Mode::Flag(flag) => flag.handle_key(key, &self.config.flag, effects),
        }
    }

    fn start_game(&mut self, game: GameKind, difficulty: Difficulty, effects: &mut Effects) {
        let mode = match game {
            GameKind::Bomb => Mode::Bomb(BombState::start(
                difficulty,
                self.config.hard_mode_auto_unlock,
                &self.config.bomb,
                &mut self.codes,
                effects,
            )),
            GameKind::Bunker => Mode::Bunker(BunkerState::start(effects)),
            GameKind::Flag => Mode::Flag(FlagState::start(effects)),
        };
        self.enter(mode);
    }

    fn enter(&mut self, mode: Mode) {
        let from = self.mode.phase();
        let to = mode.phase();
        self.mode = mode;
        if from == to {
            return;
        }
        info!(%from, %to, "phase changed");
        self.history.push_back(PhaseTransition {
            from,
            to,
            at: self.scheduler.now(),
        });
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }

    fn fire(&mut self, key: TimerKey) {
        trace!(%key, now = ?self.scheduler.now(), "timer fired");
        let mut effects = Effects::new();
        match (key, &mut self.mode) {
            (TimerKey::MenuHold, mode) => {
                if self.menu_key_held && mode.phase() != Phase::Menu {
                    info!("menu key held");
                    effects.return_to_menu();
                }
            }
            (_, Mode::Bomb(bomb)) => {
                bomb.on_timer(key, &self.config.bomb, &mut self.codes, &mut effects);
            }
            (_, Mode::Bunker(bunker)) => {
                bunker.on_timer(key, &self.config.bunker, &mut effects);
            }
            (_, mode) => debug!(%key, phase = %mode.phase(), "stale timer"),
        }
        self.apply(effects);
        self.publish();
    }

    fn apply(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                Effect::Led(command) => {
                    if let Err(error) = self.leds.execute(command) {
                        warn!(?command, %error, "led command failed");
                    }
                }
                Effect::Cue(cue) => self.play(cue),
                Effect::Schedule(key, delay) => {
                    self.scheduler.schedule(key, delay);
                }
                Effect::Cancel(key) => {
                    self.scheduler.cancel(key);
                }
                Effect::ReturnToMenu => {
                    self.reset_to_menu();
                    return;
                }
            }
        }
    }

    fn play(&mut self, cue: AudioCue) {
        if !self.config.audio_enabled {
            trace!(%cue, "audio disabled");
            return;
        }
        if let Err(error) = self.audio.play(cue) {
            warn!(%cue, %error, "audio cue failed");
        }
    }

    fn publish(&self) {
        let mode = &self.mode;
        let nfc_available = self.nfc_available;
        self.updates.send_if_modified(|snapshot| {
            if snapshot.mode == *mode && snapshot.nfc_available == nfc_available {
                return false;
            }
            snapshot.revision += 1;
            snapshot.mode = mode.clone();
            snapshot.nfc_available = nfc_available;
            true
        });
    }
}

/// Builder for [`GameController`].
///
/// ```
/// use suitcase_core::GameConfig;
/// use suitcase_game::GameController;
/// use suitcase_hardware::mock::{MockAudio, MockLed};
///
/// let config = GameConfig {
///     audio_enabled: false,
///     ..GameConfig::default()
/// };
/// let game = GameController::builder(MockLed::new(), MockAudio::new())
///     .with_config(config)
///     .with_nfc_available(true)
///     .build()
///     .unwrap();
///
/// assert!(game.snapshot().nfc_available);
/// ```
#[derive(Debug)]
pub struct GameControllerBuilder<L, A> {
    leds: L,
    audio: A,
    config: GameConfig,
    seed: Option<u64>,
    nfc_available: bool,
}

impl<L: LedSignaler, A: AudioSignaler> GameControllerBuilder<L, A> {
    pub fn new(leds: L, audio: A) -> Self {
        Self {
            leds,
            audio,
            config: GameConfig::default(),
            seed: None,
            nfc_available: false,
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the code generator for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_nfc_available(mut self, available: bool) -> Self {
        self.nfc_available = available;
        self
    }

    /// Validate the configuration and bring the controller up at the menu.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is inconsistent.
    pub fn build(self) -> suitcase_core::Result<GameController<L, A>> {
        self.config.validate()?;
        let codes = self.seed.map(CodeGenerator::seeded).unwrap_or_default();
        let (updates, _) = watch::channel(GameSnapshot {
            revision: 0,
            nfc_available: self.nfc_available,
            mode: Mode::default(),
        });

        let mut controller = GameController {
            config: self.config,
            mode: Mode::default(),
            scheduler: Scheduler::new(),
            codes,
            leds: self.leds,
            audio: self.audio,
            menu_key_held: false,
            nfc_available: self.nfc_available,
            history: VecDeque::new(),
            updates,
        };
        controller.reset_to_menu();
        info!(nfc = controller.nfc_available, "controller ready");
        Ok(controller)
    }
}
