// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, time::Duration};

use super::error::SequencerError;

/// The tempo used when nothing else is configured.
const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Sixteenth-note steps per quarter note.
const STEPS_PER_BEAT: f64 = 4.0;

/// A validated tempo in beats per minute. Always positive and finite, with a
/// step interval that is non-zero and representable as a `Duration`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Tempo {
    bpm: f64,
    step_interval: Duration,
}

impl Tempo {
    /// Creates a tempo. Rejects zero, negative and non-finite values, and tempos so
    /// fast or so slow that the step interval rounds to zero or overflows.
    pub fn new(bpm: f64) -> Result<Tempo, SequencerError> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(SequencerError::InvalidTempo(bpm));
        }

        match Duration::try_from_secs_f64(60.0 / (STEPS_PER_BEAT * bpm)) {
            Ok(step_interval) if !step_interval.is_zero() => Ok(Tempo { bpm, step_interval }),
            _ => Err(SequencerError::InvalidTempo(bpm)),
        }
    }

    /// Returns the tempo in beats per minute.
    pub fn bpm(self) -> f64 {
        self.bpm
    }

    /// The time between two sixteenth-note steps: 60 / (4 * bpm) seconds.
    pub fn step_interval(self) -> Duration {
        self.step_interval
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo {
            bpm: DEFAULT_TEMPO_BPM,
            step_interval: Duration::from_secs_f64(60.0 / (STEPS_PER_BEAT * DEFAULT_TEMPO_BPM)),
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} bpm", self.bpm)
    }
}

/// Converts a raw bpm value into the clock interval between steps.
pub fn interval(bpm: f64) -> Result<Duration, SequencerError> {
    Ok(Tempo::new(bpm)?.step_interval())
}
