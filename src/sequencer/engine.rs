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

//! The step sequencer state machine: per-track patterns, the track selected for
//! editing, and the step cursor.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::error::SequencerError;
use super::instrument::{Instrument, Track, TRACK_COUNT};
use super::pattern::{Pattern, STEPS};
use crate::audio::SampleTrigger;

/// One row of the track table.
struct TrackSlot {
    /// The armed steps for this track.
    pattern: Pattern,
    /// The instrument fired when an armed step is reached.
    instrument: Instrument,
}

/// Owns the patterns and the step cursor and fires samples as the cursor advances.
///
/// The engine is not internally synchronized. When it is shared between the clock
/// thread and the UI it must sit behind a lock so a toggle can never interleave
/// with an advance.
pub struct SequencerEngine {
    /// The track table, indexed by `Track::index`.
    tracks: [TrackSlot; TRACK_COUNT],
    /// The track that `toggle_selected` edits.
    selected: Track,
    /// Monotonic step counter. Only `cursor % STEPS` is meaningful, and since
    /// 2^64 is a multiple of STEPS, wrapping keeps the musical position.
    cursor: u64,
    /// Where samples are sent.
    trigger: Arc<dyn SampleTrigger>,
}

impl SequencerEngine {
    /// Creates an engine with empty patterns, the cursor at step 0 and the kick selected.
    pub fn new(trigger: Arc<dyn SampleTrigger>) -> SequencerEngine {
        SequencerEngine {
            tracks: Track::ALL.map(|track| TrackSlot {
                pattern: Pattern::default(),
                instrument: track.instrument(),
            }),
            selected: Track::default(),
            cursor: 0,
            trigger,
        }
    }

    /// Flips the given step of the given track and returns whether it is now armed.
    pub fn toggle_step(&mut self, track: Track, step: usize) -> Result<bool, SequencerError> {
        let armed = self.tracks[track.index()].pattern.toggle(step)?;
        debug!(track = %track, step, armed, "Step toggled");
        Ok(armed)
    }

    /// Selects the track edited by `toggle_selected`.
    pub fn select_track(&mut self, track: Track) {
        debug!(track = %track, "Track selected");
        self.selected = track;
    }

    /// Returns the track currently selected for editing.
    pub fn selected_track(&self) -> Track {
        self.selected
    }

    /// Shorthand for `toggle_step(selected_track(), step)`. The selection is read
    /// when the call is made, so callers that change the selection from another
    /// thread must serialize both calls themselves.
    pub fn toggle_selected(&mut self, step: usize) -> Result<bool, SequencerError> {
        self.toggle_step(self.selected, step)
    }

    /// Plays every track armed at the current step, then moves the cursor forward.
    /// Returns the step that was played.
    pub fn advance(&mut self) -> usize {
        let step = self.current_step_index();
        for slot in self.tracks.iter().filter(|slot| slot.pattern.is_armed(step)) {
            debug!(step, instrument = %slot.instrument, "Step triggered");
            self.trigger.play_sample(slot.instrument);
        }
        self.cursor = self.cursor.wrapping_add(1);
        step
    }

    /// The position of the cursor within the 16-step cycle.
    pub fn current_step_index(&self) -> usize {
        (self.cursor % STEPS as u64) as usize
    }

    /// Returns a copy of the given track's pattern.
    pub fn pattern(&self, track: Track) -> Pattern {
        self.tracks[track.index()].pattern
    }

    /// Creates an engine whose cursor starts at the given value.
    #[cfg(test)]
    pub fn with_cursor(trigger: Arc<dyn SampleTrigger>, cursor: u64) -> SequencerEngine {
        let mut engine = SequencerEngine::new(trigger);
        engine.cursor = cursor;
        engine
    }
}

impl fmt::Debug for SequencerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("SequencerEngine");
        for track in Track::ALL {
            debug.field(track.instrument().name(), &self.pattern(track).to_string());
        }
        debug
            .field("selected", &self.selected)
            .field("step", &self.current_step_index())
            .field("trigger", &self.trigger.to_string())
            .finish()
    }
}
