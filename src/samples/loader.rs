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

//! WAV loading for the kit samples.
//!
//! Samples are decoded to mono f32 and held in memory for the life of the kit.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use hound::{SampleFormat, WavReader};
use tracing::{debug, info};

/// A loaded mono sample.
/// The sample data is stored in an Arc for efficient sharing with the output thread.
#[derive(Clone)]
pub struct LoadedSample {
    /// The sample data as mono f32 samples in -1.0..=1.0.
    data: Arc<Vec<f32>>,
    /// Sample rate of the audio data.
    sample_rate: u32,
}

impl LoadedSample {
    /// Loads a WAV file into memory. Integer formats are normalized and multi-channel
    /// files are downmixed to mono.
    pub fn load(path: &Path) -> Result<LoadedSample, Box<dyn Error>> {
        let mut reader = WavReader::open(path)
            .map_err(|e| format!("Failed to load sample {}: {}", path.display(), e))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
            SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|x| x as f32 / max))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };

        let channels = usize::from(spec.channels.max(1));
        let data: Vec<f32> = if channels == 1 {
            samples
        } else {
            samples
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        let loaded = LoadedSample::new(data, spec.sample_rate);
        info!(
            path = ?path,
            channels = spec.channels,
            sample_rate = spec.sample_rate,
            duration_ms = loaded.duration().as_millis(),
            "Sample loaded"
        );
        Ok(loaded)
    }

    /// Creates a sample from raw mono data.
    pub fn new(data: Vec<f32>, sample_rate: u32) -> LoadedSample {
        LoadedSample {
            data: Arc::new(data),
            sample_rate,
        }
    }

    /// Returns the sample data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the playing time of the sample.
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.data.len() as f64 / f64::from(self.sample_rate))
    }

    /// Converts the sample to the target rate using linear interpolation, which is
    /// sufficient for one-shot drum hits. Returns a cheap clone if the rates match.
    pub fn resample(&self, target_rate: u32) -> LoadedSample {
        if self.sample_rate == target_rate || self.sample_rate == 0 || self.data.is_empty() {
            return self.clone();
        }

        debug!(
            source_rate = self.sample_rate,
            target_rate, "Resampling sample"
        );
        let ratio = f64::from(target_rate) / f64::from(self.sample_rate);
        let target_len = (self.data.len() as f64 * ratio).ceil() as usize;

        let output = (0..target_len)
            .map(|i| {
                let source_pos = i as f64 / ratio;
                let idx = source_pos.floor() as usize;
                let frac = source_pos.fract() as f32;

                let s0 = self.data.get(idx).copied().unwrap_or(0.0);
                let s1 = self.data.get(idx + 1).copied().unwrap_or(s0);
                s0 + (s1 - s0) * frac
            })
            .collect();

        LoadedSample::new(output, target_rate)
    }
}

impl std::fmt::Debug for LoadedSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedSample")
            .field("samples", &self.data.len())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}
