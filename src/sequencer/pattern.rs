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
use std::fmt;

use super::error::SequencerError;

/// The number of steps in every pattern. One step is a sixteenth note.
pub const STEPS: usize = 16;

/// Validates a raw step index coming from outside the engine.
pub fn step_index(index: i64) -> Result<usize, SequencerError> {
    usize::try_from(index)
        .ok()
        .filter(|step| *step < STEPS)
        .ok_or(SequencerError::IndexOutOfRange(index))
}

/// The armed steps of a single track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    steps: [bool; STEPS],
}

impl Pattern {
    /// Returns true if the given step is armed. Out of range steps are never armed.
    pub fn is_armed(&self, step: usize) -> bool {
        self.steps.get(step).copied().unwrap_or(false)
    }

    /// Flips the given step and returns its new state.
    pub fn toggle(&mut self, step: usize) -> Result<bool, SequencerError> {
        let cell = self.steps.get_mut(step).ok_or_else(|| {
            SequencerError::IndexOutOfRange(i64::try_from(step).unwrap_or(i64::MAX))
        })?;
        *cell = !*cell;
        Ok(*cell)
    }

    /// Iterates over the steps in order.
    pub fn steps(&self) -> impl Iterator<Item = bool> + '_ {
        self.steps.iter().copied()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for armed in self.steps() {
            f.write_str(if armed { "x" } else { "." })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_index() {
        assert_eq!(Ok(0), step_index(0));
        assert_eq!(Ok(15), step_index(15));
        assert_eq!(Err(SequencerError::IndexOutOfRange(16)), step_index(16));
        assert_eq!(Err(SequencerError::IndexOutOfRange(-1)), step_index(-1));
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut pattern = Pattern::default();
        for step in 0..STEPS {
            let original = pattern;
            assert_eq!(Ok(true), pattern.toggle(step));
            assert!(pattern.is_armed(step));
            assert_eq!(Ok(false), pattern.toggle(step));
            assert_eq!(original, pattern);
        }
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut pattern = Pattern::default();
        assert_eq!(
            Err(SequencerError::IndexOutOfRange(16)),
            pattern.toggle(STEPS)
        );
        assert!(!pattern.is_armed(STEPS));
        assert_eq!(
            Err(SequencerError::IndexOutOfRange(i64::MAX)),
            pattern.toggle(usize::MAX)
        );
        assert_eq!(Pattern::default(), pattern);
    }

    #[test]
    fn test_display() {
        let mut pattern = Pattern::default();
        assert_eq!("................", pattern.to_string());

        for step in [0, 4, 8, 12] {
            pattern.toggle(step).unwrap();
        }
        assert_eq!("x...x...x...x...", pattern.to_string());
    }
}
