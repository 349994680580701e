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

/// Precondition failures at the sequencer's API boundary. These are always
/// caller-input errors and are returned to the caller rather than retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SequencerError {
    #[error("step index {0} is out of range, expected 0 to 15")]
    IndexOutOfRange(i64),

    #[error("invalid tempo {0} bpm, tempo must be a positive finite number")]
    InvalidTempo(f64),

    #[error("unknown track {0}, expected one of kick, snare, hihat")]
    UnknownTrack(String),

    #[error("unknown instrument {0}")]
    UnknownInstrument(String),
}
