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
use std::{fmt, str::FromStr};

use super::error::SequencerError;

/// The number of playable pads on the 3x3 grid.
pub const INSTRUMENT_COUNT: usize = 9;

/// One of the nine drum voices. The discriminant is the pad id, which is also the
/// sample identifier handed to the audio backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instrument {
    Kick = 0,
    RimShot = 1,
    Snare = 2,
    Clap = 3,
    ClosedHiHat = 4,
    OpenHiHat = 5,
    HiTom = 6,
    MidTom = 7,
    LoTom = 8,
}

impl Instrument {
    /// All instruments in pad order.
    pub const ALL: [Instrument; INSTRUMENT_COUNT] = [
        Instrument::Kick,
        Instrument::RimShot,
        Instrument::Snare,
        Instrument::Clap,
        Instrument::ClosedHiHat,
        Instrument::OpenHiHat,
        Instrument::HiTom,
        Instrument::MidTom,
        Instrument::LoTom,
    ];

    /// The pad id of this instrument.
    pub fn id(self) -> usize {
        self as usize
    }

    /// The name used in config files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::RimShot => "rim",
            Instrument::Snare => "snare",
            Instrument::Clap => "clap",
            Instrument::ClosedHiHat => "hihat",
            Instrument::OpenHiHat => "openhat",
            Instrument::HiTom => "hitom",
            Instrument::MidTom => "midtom",
            Instrument::LoTom => "lotom",
        }
    }

    /// The file name of this instrument in the stock 808 kit.
    pub fn default_file(self) -> &'static str {
        match self {
            Instrument::Kick => "bd7575.wav",
            Instrument::RimShot => "rs.wav",
            Instrument::Snare => "sd7575.wav",
            Instrument::Clap => "cp.wav",
            Instrument::ClosedHiHat => "ch.wav",
            Instrument::OpenHiHat => "oh75.wav",
            Instrument::HiTom => "ht75.wav",
            Instrument::MidTom => "mt75.wav",
            Instrument::LoTom => "lt75.wav",
        }
    }
}

impl TryFrom<usize> for Instrument {
    type Error = SequencerError;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        Instrument::ALL
            .get(id)
            .copied()
            .ok_or_else(|| SequencerError::UnknownInstrument(id.to_string()))
    }
}

impl FromStr for Instrument {
    type Err = SequencerError;

    /// Accepts either a pad id or an instrument name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<usize>() {
            return Instrument::try_from(id);
        }

        let lower = s.to_lowercase();
        Instrument::ALL
            .iter()
            .find(|instrument| instrument.name() == lower)
            .copied()
            .ok_or_else(|| SequencerError::UnknownInstrument(s.to_string()))
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The number of sequenceable tracks.
pub const TRACK_COUNT: usize = 3;

/// A sequenceable drum voice. Only three of the nine instruments can be
/// sequenced; the rest are pad-only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Track {
    #[default]
    Kick,
    Snare,
    ClosedHiHat,
}

impl Track {
    /// All tracks in selector order.
    pub const ALL: [Track; TRACK_COUNT] = [Track::Kick, Track::Snare, Track::ClosedHiHat];

    /// The selector position of this track.
    pub fn index(self) -> usize {
        match self {
            Track::Kick => 0,
            Track::Snare => 1,
            Track::ClosedHiHat => 2,
        }
    }

    /// The instrument this track triggers.
    pub fn instrument(self) -> Instrument {
        match self {
            Track::Kick => Instrument::Kick,
            Track::Snare => Instrument::Snare,
            Track::ClosedHiHat => Instrument::ClosedHiHat,
        }
    }
}

impl TryFrom<usize> for Track {
    type Error = SequencerError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Track::ALL
            .get(index)
            .copied()
            .ok_or_else(|| SequencerError::UnknownTrack(index.to_string()))
    }
}

impl TryFrom<Instrument> for Track {
    type Error = SequencerError;

    fn try_from(instrument: Instrument) -> Result<Self, Self::Error> {
        Track::ALL
            .iter()
            .find(|track| track.instrument() == instrument)
            .copied()
            .ok_or_else(|| SequencerError::UnknownTrack(instrument.to_string()))
    }
}

impl FromStr for Track {
    type Err = SequencerError;

    /// Accepts a selector index or the name of a sequenceable instrument.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Track::try_from(index);
        }

        let instrument =
            Instrument::from_str(s).map_err(|_| SequencerError::UnknownTrack(s.to_string()))?;
        Track::try_from(instrument)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.instrument().fmt(f)
    }
}
