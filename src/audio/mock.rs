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
use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use crate::sequencer::Instrument;

/// A mock trigger. Doesn't play anything, but remembers every trigger it received.
#[derive(Clone)]
pub struct Trigger {
    name: String,
    triggered: Arc<Mutex<Vec<Instrument>>>,
}

impl Trigger {
    /// Gets the given mock trigger.
    pub fn get(name: &str) -> Trigger {
        Trigger {
            name: name.to_string(),
            triggered: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns every instrument triggered so far, in order.
    #[cfg(test)]
    pub fn triggered(&self) -> Vec<Instrument> {
        self.triggered.lock().clone()
    }

    /// Returns the number of triggers received so far.
    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.triggered.lock().len()
    }

    /// Forgets all recorded triggers.
    #[cfg(test)]
    pub fn reset(&self) {
        self.triggered.lock().clear();
    }
}

impl crate::audio::SampleTrigger for Trigger {
    fn play_sample(&self, instrument: Instrument) {
        debug!(device = self.name, instrument = %instrument, "Playing sample.");
        self.triggered.lock().push(instrument);
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}

#[cfg(test)]
mod test {
    use crate::audio::SampleTrigger;

    use super::*;

    #[test]
    fn test_records_triggers() {
        let trigger = Trigger::get("mock-device");
        assert_eq!("mock-device (Mock)", trigger.to_string());

        trigger.play_sample(Instrument::Kick);
        trigger.play_sample(Instrument::Kick);
        trigger.play_sample(Instrument::Clap);
        assert_eq!(
            vec![Instrument::Kick, Instrument::Kick, Instrument::Clap],
            trigger.triggered()
        );

        // Clones share the same record.
        let clone = trigger.clone();
        clone.play_sample(Instrument::LoTom);
        assert_eq!(4, trigger.count());

        trigger.reset();
        assert_eq!(0, clone.count());
    }
}
