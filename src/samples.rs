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

//! The drum kit's sample data.
//!
//! This module provides:
//! - WAV loading into memory for zero-latency playback
//! - The nine-instrument kit loaded from the kit config
//! - Per-instrument voices with restart-on-retrigger

use std::error::Error;

use tracing::{info, span, Level};

use crate::config;
use crate::sequencer::{Instrument, INSTRUMENT_COUNT};

mod loader;
mod voice;

pub use loader::LoadedSample;
pub use voice::VoiceBank;

/// One loaded sample for every instrument, indexed by pad id.
#[derive(Clone, Debug)]
pub struct Kit {
    samples: [LoadedSample; INSTRUMENT_COUNT],
}

impl Kit {
    /// Loads every instrument's file. A missing or unreadable file fails the load.
    pub fn load(config: &config::Kit) -> Result<Kit, Box<dyn Error>> {
        let span = span!(Level::INFO, "kit", path = %config.path().display());
        let _enter = span.enter();

        let mut samples = Vec::with_capacity(INSTRUMENT_COUNT);
        for instrument in Instrument::ALL {
            let path = config.file_for(instrument);
            let sample = LoadedSample::load(&path)
                .map_err(|e| format!("unable to load {} sample: {}", instrument, e))?;
            samples.push(sample);
        }

        let kit = Kit::from_samples(samples)?;
        info!(
            memory_kb = kit.memory_size() / 1024,
            "Loaded kit."
        );
        Ok(kit)
    }

    fn from_samples(samples: Vec<LoadedSample>) -> Result<Kit, Box<dyn Error>> {
        let samples: [LoadedSample; INSTRUMENT_COUNT] = samples
            .try_into()
            .map_err(|samples: Vec<LoadedSample>| {
                format!(
                    "expected {} samples, found {}",
                    INSTRUMENT_COUNT,
                    samples.len()
                )
            })?;
        Ok(Kit { samples })
    }

    /// Returns the sample for the given instrument.
    pub fn sample(&self, instrument: Instrument) -> &LoadedSample {
        &self.samples[instrument.id()]
    }

    /// Returns the total memory used by the kit's samples.
    pub fn memory_size(&self) -> usize {
        self.samples
            .iter()
            .map(|sample| std::mem::size_of_val(sample.data()))
            .sum()
    }

    /// Builds a voice bank with every sample converted to the output rate.
    pub fn voices(&self, sample_rate: u32, gain: f32) -> VoiceBank {
        VoiceBank::new(
            self.samples
                .each_ref()
                .map(|sample| sample.resample(sample_rate)),
            gain,
        )
    }
}
