//! Recording audio output.

use crate::{HardwareError, Result, traits::AudioSignaler, types::AudioCue};

#[derive(Debug, Default)]
pub struct MockAudio {
    played: Vec<AudioCue>,
    failing: bool,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail, to exercise error handling.
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Cues played so far, oldest first.
    pub fn played(&self) -> &[AudioCue] {
        &self.played
    }

    /// How often `cue` was played.
    pub fn count(&self, cue: AudioCue) -> usize {
        self.played.iter().filter(|&&c| c == cue).count()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }
}

impl AudioSignaler for MockAudio {
    fn play(&mut self, cue: AudioCue) -> Result<()> {
        if self.failing {
            return Err(HardwareError::playback(format!("mock failure playing {cue}")));
        }
        self.played.push(cue);
        Ok(())
    }
}
