//! Tokio driver for a [`GameController`].
//!
//! The controller is synchronous and keeps its own clock. [`run`] maps that
//! clock onto `tokio::time`: it sleeps until the next timer deadline or the
//! next input, whichever comes first, and catches the controller up to the
//! wall clock before handing it anything.
//!
//! ```no_run
//! use suitcase_core::{InputEvent, Key};
//! use suitcase_game::{GameController, runtime};
//! use suitcase_hardware::mock::{MockAudio, MockLed};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> suitcase_core::Result<()> {
//! let game = GameController::builder(MockLed::new(), MockAudio::new()).build()?;
//! let (tx, rx) = mpsc::channel(32);
//! let driver = tokio::spawn(runtime::run(game, rx));
//!
//! tx.send(InputEvent::Key(Key::symbol('2')?)).await.ok();
//! drop(tx);
//! let game = driver.await.expect("driver panicked");
//! # Ok(())
//! # }
//! ```

use crate::controller::GameController;
use suitcase_core::InputEvent;
use suitcase_hardware::{AudioSignaler, LedSignaler};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

/// Drive `controller` until the input channel closes, then hand it back.
pub async fn run<L, A>(
    mut controller: GameController<L, A>,
    mut events: mpsc::Receiver<InputEvent>,
) -> GameController<L, A>
where
    L: LedSignaler,
    A: AudioSignaler,
{
    let origin = Instant::now()
        .checked_sub(controller.now())
        .unwrap_or_else(Instant::now);
    info!("game loop started");

    loop {
        let deadline = controller.next_deadline().map(|at| origin + at);
        tokio::select! {
            event = events.recv() => {
                controller.advance_to(origin.elapsed());
                match event {
                    Some(event) => {
                        debug!(?event, "event");
                        controller.handle_event(event);
                    }
                    None => break,
                }
            }
            _ = wait_until(deadline) => {
                controller.advance_to(origin.elapsed());
            }
        }
    }

    info!("input closed, game loop stopped");
    controller
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
