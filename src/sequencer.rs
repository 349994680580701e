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

//! 16-step drum sequencing.
//!
//! This module provides:
//! - The instrument and track identifiers
//! - Per-track step patterns and the sequencer engine that plays them
//! - Tempo to step interval conversion
//! - The clock that advances the engine in real time

mod clock;
mod engine;
mod error;
mod instrument;
mod pattern;
mod tempo;
mod thread_priority;

pub use clock::Clock;
pub use engine::SequencerEngine;
pub use error::SequencerError;
pub use instrument::{Instrument, Track, INSTRUMENT_COUNT};
pub use pattern::{step_index, Pattern};
pub use tempo::{interval, Tempo};
