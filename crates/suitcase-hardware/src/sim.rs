//! Output drivers for running the prop without its LED hardware.
//!
//! [`TracingLed`] logs every LED command instead of driving GPIO pins.
//! [`CommandAudio`] plays cue files with an external player (`mpg123` by
//! default) and rings the terminal bell for beeps.

use crate::{
    HardwareError, Result,
    traits::{AudioSignaler, LedSignaler},
    types::{AudioCue, Indicator, LedColor, LedCommand},
};
use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, trace, warn};

/// LED driver that writes each command to the log.
#[derive(Debug, Default)]
pub struct TracingLed {
    executed: u64,
}

impl TracingLed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    fn log(&mut self, command: LedCommand) -> Result<()> {
        self.executed += 1;
        trace!(target: "suitcase::led", ?command, "led");
        Ok(())
    }
}

impl LedSignaler for TracingLed {
    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<()> {
        self.log(LedCommand::SetIndicator { indicator, on })
    }

    fn fill_strip(&mut self, color: LedColor) -> Result<()> {
        self.log(LedCommand::FillStrip(color))
    }

    fn start_blink(&mut self, indicator: Indicator, period: Duration) -> Result<()> {
        self.log(LedCommand::StartBlink { indicator, period })
    }

    fn set_blink_period(&mut self, indicator: Indicator, period: Duration) -> Result<()> {
        self.log(LedCommand::SetBlinkPeriod { indicator, period })
    }

    fn stop_blink(&mut self, indicator: Indicator) -> Result<()> {
        self.log(LedCommand::StopBlink(indicator))
    }

    fn start_pulse(&mut self, color: LedColor, period: Duration) -> Result<()> {
        self.log(LedCommand::StartPulse { color, period })
    }

    fn set_pulse_period(&mut self, period: Duration) -> Result<()> {
        self.log(LedCommand::SetPulsePeriod(period))
    }

    fn stop_pulse(&mut self) -> Result<()> {
        self.log(LedCommand::StopPulse)
    }
}

/// Audio output that shells out to a command-line player.
#[derive(Debug, Clone)]
pub struct CommandAudio {
    program: PathBuf,
    assets_dir: PathBuf,
    bell: bool,
}

impl CommandAudio {
    pub const DEFAULT_PLAYER: &'static str = "mpg123";

    pub fn new(program: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            assets_dir: assets_dir.into(),
            bell: true,
        }
    }

    /// Look up the default player on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if no player is installed.
    pub fn detect(assets_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::detect_player(Self::DEFAULT_PLAYER, assets_dir)
    }

    /// Look up `player` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if `player` is not installed.
    pub fn detect_player(player: &str, assets_dir: impl Into<PathBuf>) -> Result<Self> {
        let program = which::which(player)
            .map_err(|e| HardwareError::initialization_failed(format!("{player}: {e}")))?;
        Ok(Self::new(program, assets_dir))
    }

    /// Disable the terminal bell used for beeps.
    pub fn without_bell(mut self) -> Self {
        self.bell = false;
        self
    }

    pub fn cue_path(&self, cue: AudioCue) -> Option<PathBuf> {
        cue.file_name().map(|name| self.assets_dir.join(name))
    }
}

impl AudioSignaler for CommandAudio {
    fn play(&mut self, cue: AudioCue) -> Result<()> {
        let Some(path) = self.cue_path(cue) else {
            if self.bell {
                let mut stdout = std::io::stdout();
                stdout.write_all(b"\x07")?;
                stdout.flush()?;
            }
            return Ok(());
        };

        if !path.exists() {
            return Err(HardwareError::playback(format!(
                "missing asset {}",
                path.display()
            )));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| HardwareError::playback("no runtime to supervise the player"))?;
        let mut child = Command::new(&self.program)
            .arg("-q")
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| HardwareError::playback(format!("{}: {e}", self.program.display())))?;
        debug!(%cue, pid = child.id(), "playing");

        runtime.spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => warn!(%cue, %status, "player failed"),
                Ok(_) => {}
                Err(e) => warn!(%cue, error = %e, "lost track of player"),
            }
        });
        Ok(())
    }
}
