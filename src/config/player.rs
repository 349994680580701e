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
use serde::Deserialize;

use super::audio::Audio;
use super::kit::Kit;
use crate::sequencer::{SequencerError, Tempo};

/// The configuration for the drum sampler.
#[derive(Deserialize, Clone, Debug)]
pub struct Player {
    /// The audio output configuration.
    #[serde(default)]
    audio: Audio,
    /// The tempo the sequencer starts with, in beats per minute.
    tempo: Option<f64>,
    /// The sample kit.
    kit: Kit,
}

impl Player {
    /// Returns the audio configuration.
    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    /// Returns the starting tempo (default: 120 bpm).
    pub fn tempo(&self) -> Result<Tempo, SequencerError> {
        self.tempo.map_or(Ok(Tempo::default()), Tempo::new)
    }

    /// Returns the kit configuration.
    pub fn kit(&self) -> &Kit {
        &self.kit
    }

    pub(super) fn kit_mut(&mut self) -> &mut Kit {
        &mut self.kit
    }
}
