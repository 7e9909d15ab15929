//! Game logic of the airsoft suitcase.
//!
//! A [`GameController`] runs one session at a time: the menu, or one of the
//! three games (Bomb, Bunker, Flag). It is synchronous and owns a virtual
//! clock, so tests drive it with [`GameController::advance`] while
//! production wraps it in [`runtime::run`].

pub mod bomb;
pub mod bunker;
pub mod controller;
pub mod effects;
pub mod flag;
pub mod menu;
pub mod runtime;
pub mod scheduler;
pub mod snapshot;

pub use bomb::{BombOutcome, BombStage, BombState};
pub use bunker::BunkerState;
pub use controller::{GameController, GameControllerBuilder, PhaseTransition};
pub use effects::{Effect, Effects};
pub use flag::FlagState;
pub use menu::{MenuLevel, MenuState};
pub use scheduler::{Scheduler, TimerKey};
pub use snapshot::{GameSnapshot, Mode};
