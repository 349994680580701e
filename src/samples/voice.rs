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

//! Per-instrument playback voices.
//!
//! Each instrument owns exactly one voice. Triggering an instrument that is already
//! sounding cuts the old hit and restarts the sample from the beginning.

use crate::sequencer::{Instrument, INSTRUMENT_COUNT};

use super::LoadedSample;

/// A single playing sample.
struct Voice {
    sample: LoadedSample,
    /// Next sample to play, or None when silent.
    position: Option<usize>,
}

impl Voice {
    fn next(&mut self) -> f32 {
        let Some(position) = self.position else {
            return 0.0;
        };
        match self.sample.data().get(position) {
            Some(value) => {
                self.position = Some(position + 1);
                *value
            }
            None => {
                self.position = None;
                0.0
            }
        }
    }
}

/// One voice per instrument, mixed into interleaved output buffers.
pub struct VoiceBank {
    voices: Vec<Voice>,
    gain: f32,
}

impl VoiceBank {
    /// Creates a bank from the kit's samples, which must already be at the output rate.
    pub fn new(samples: [LoadedSample; INSTRUMENT_COUNT], gain: f32) -> VoiceBank {
        VoiceBank {
            voices: samples
                .into_iter()
                .map(|sample| Voice {
                    sample,
                    position: None,
                })
                .collect(),
            gain,
        }
    }

    /// Starts (or restarts) the instrument's sample.
    pub fn trigger(&mut self, instrument: Instrument) {
        if let Some(voice) = self.voices.get_mut(instrument.id()) {
            voice.position = Some(0);
        }
    }

    /// Returns the number of voices currently sounding.
    pub fn active_count(&self) -> usize {
        self.voices
            .iter()
            .filter(|voice| voice.position.is_some())
            .count()
    }

    /// Mixes all active voices into the interleaved buffer, writing the same value to
    /// every channel of a frame. The buffer is overwritten, not accumulated.
    pub fn render(&mut self, output: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in output.chunks_mut(channels) {
            let mixed = self.voices.iter_mut().map(Voice::next).sum::<f32>() * self.gain;
            frame.fill(mixed.clamp(-1.0, 1.0));
        }
    }
}

impl std::fmt::Debug for VoiceBank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceBank")
            .field("active_voices", &self.active_count())
            .field("gain", &self.gain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(gain: f32) -> VoiceBank {
        VoiceBank::new(
            Instrument::ALL.map(|instrument| {
                LoadedSample::new(vec![0.1 * (instrument.id() + 1) as f32; 3], 48000)
            }),
            gain,
        )
    }

    #[test]
    fn test_silent_until_triggered() {
        let mut bank = bank(1.0);
        let mut output = [1.0f32; 8];
        bank.render(&mut output, 2);
        assert_eq!([0.0; 8], output);
        assert_eq!(0, bank.active_count());
    }

    #[test]
    fn test_render_to_end() {
        let mut bank = bank(0.5);
        bank.trigger(Instrument::Kick);
        assert_eq!(1, bank.active_count());

        let mut output = [0.0f32; 8];
        bank.render(&mut output, 2);
        for value in &output[..6] {
            assert!((value - 0.05).abs() < 1e-6);
        }
        assert_eq!([0.0, 0.0], output[6..]);
        assert_eq!(0, bank.active_count());
    }

    #[test]
    fn test_retrigger_restarts() {
        let mut bank = bank(1.0);
        bank.trigger(Instrument::Snare);

        let mut output = [0.0f32; 2];
        bank.render(&mut output, 1);
        bank.trigger(Instrument::Snare);

        // Three full samples remain after the restart instead of one.
        let mut output = [0.0f32; 4];
        bank.render(&mut output, 1);
        assert!(output[..3].iter().all(|value| (value - 0.3).abs() < 1e-6));
        assert_eq!(0.0, output[3]);
    }

    #[test]
    fn test_mix_and_clamp() {
        let mut bank = bank(1.0);
        for instrument in Instrument::ALL {
            bank.trigger(instrument);
        }
        assert_eq!(INSTRUMENT_COUNT, bank.active_count());

        let mut output = [0.0f32; 1];
        bank.render(&mut output, 1);
        assert_eq!(1.0, output[0]);
    }
}
