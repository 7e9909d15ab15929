//! Recording LED driver.
//!
//! Keeps the log of executed [`LedCommand`]s and the resulting visible state
//! so tests can assert on either.

use crate::{
    HardwareError, Result,
    traits::LedSignaler,
    types::{Indicator, LedColor, LedCommand},
};
use std::time::Duration;
use tracing::trace;

/// Visible state of one status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    #[default]
    Off,
    On,
    Blinking(Duration),
}

/// Visible state of the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripState {
    #[default]
    Off,
    Solid(LedColor),
    Pulsing { color: LedColor, period: Duration },
}

#[derive(Debug, Default)]
pub struct MockLed {
    commands: Vec<LedCommand>,
    red: IndicatorState,
    blue: IndicatorState,
    strip: StripState,
    failing: bool,
}

impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail, to exercise error handling.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Commands executed so far, oldest first.
    pub fn commands(&self) -> &[LedCommand] {
        &self.commands
    }

    /// Drain the command log.
    pub fn take_commands(&mut self) -> Vec<LedCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn indicator(&self, indicator: Indicator) -> IndicatorState {
        match indicator {
            Indicator::Red => self.red,
            Indicator::Blue => self.blue,
        }
    }

    pub fn strip(&self) -> StripState {
        self.strip
    }

    fn indicator_mut(&mut self, indicator: Indicator) -> &mut IndicatorState {
        match indicator {
            Indicator::Red => &mut self.red,
            Indicator::Blue => &mut self.blue,
        }
    }

    fn apply(&mut self, command: LedCommand) -> Result<()> {
        if self.failing {
            return Err(HardwareError::communication("mock LED failure"));
        }
        trace!(?command, "mock led");

        match command {
            LedCommand::SetIndicator { indicator, on } => {
                *self.indicator_mut(indicator) = if on {
                    IndicatorState::On
                } else {
                    IndicatorState::Off
                };
            }
            LedCommand::FillStrip(color) => {
                self.strip = if color == LedColor::Off {
                    StripState::Off
                } else {
                    StripState::Solid(color)
                };
            }
            LedCommand::StartBlink { indicator, period } => {
                *self.indicator_mut(indicator) = IndicatorState::Blinking(period);
            }
            LedCommand::SetBlinkPeriod { indicator, period } => {
                let state = self.indicator_mut(indicator);
                if let IndicatorState::Blinking(_) = state {
                    *state = IndicatorState::Blinking(period);
                }
            }
            LedCommand::StopBlink(indicator) => {
                *self.indicator_mut(indicator) = IndicatorState::Off;
            }
            LedCommand::StartPulse { color, period } => {
                self.strip = StripState::Pulsing { color, period };
            }
            LedCommand::SetPulsePeriod(period) => {
                if let StripState::Pulsing { color, .. } = self.strip {
                    self.strip = StripState::Pulsing { color, period };
                }
            }
            LedCommand::StopPulse => {
                if let StripState::Pulsing { .. } = self.strip {
                    self.strip = StripState::Off;
                }
            }
        }

        self.commands.push(command);
        Ok(())
    }
}

impl LedSignaler for MockLed {
    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<()> {
        self.apply(LedCommand::SetIndicator { indicator, on })
    }

    fn fill_strip(&mut self, color: LedColor) -> Result<()> {
        self.apply(LedCommand::FillStrip(color))
    }

    fn start_blink(&mut self, indicator: Indicator, period: Duration) -> Result<()> {
        self.apply(LedCommand::StartBlink { indicator, period })
    }

    fn set_blink_period(&mut self, indicator: Indicator, period: Duration) -> Result<()> {
        self.apply(LedCommand::SetBlinkPeriod { indicator, period })
    }

    fn stop_blink(&mut self, indicator: Indicator) -> Result<()> {
        self.apply(LedCommand::StopBlink(indicator))
    }

    fn start_pulse(&mut self, color: LedColor, period: Duration) -> Result<()> {
        self.apply(LedCommand::StartPulse { color, period })
    }

    fn set_pulse_period(&mut self, period: Duration) -> Result<()> {
        self.apply(LedCommand::SetPulsePeriod(period))
    }

    fn stop_pulse(&mut self) -> Result<()> {
        self.apply(LedCommand::StopPulse)
    }
}
