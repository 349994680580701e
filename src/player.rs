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
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, span, Level, Span};

use crate::audio::SampleTrigger;
use crate::sequencer::{
    interval, step_index, Clock, Instrument, Pattern, SequencerEngine, SequencerError, Tempo,
    Track,
};

/// The drum machine session. Owns the sequencer engine, the clock that drives it and
/// the trigger used for pad presses.
pub struct Player {
    /// The sequencer state, shared with the clock thread.
    engine: Arc<Mutex<SequencerEngine>>,
    /// Drives the engine while playing.
    clock: Clock,
    /// Used for manual pad presses.
    trigger: Arc<dyn SampleTrigger>,
    /// The tempo used the next time the clock starts.
    tempo: Tempo,
    /// The logging span.
    span: Span,
}

impl Player {
    /// Creates a new, stopped player.
    pub fn new(trigger: Arc<dyn SampleTrigger>, tempo: Tempo) -> Player {
        info!(trigger = %trigger, %tempo, "Creating player.");
        Player {
            engine: Arc::new(Mutex::new(SequencerEngine::new(trigger.clone()))),
            clock: Clock::new(),
            trigger,
            tempo,
            span: span!(Level::INFO, "player"),
        }
    }

    /// Toggles a step on the given track and returns whether it is now armed.
    pub fn toggle_step(&self, track: Track, index: i64) -> Result<bool, SequencerError> {
        let step = step_index(index)?;
        self.engine.lock().toggle_step(track, step)
    }

    /// Toggles a step on the selected track and returns whether it is now armed.
    pub fn toggle_selected(&self, index: i64) -> Result<bool, SequencerError> {
        let step = step_index(index)?;
        self.engine.lock().toggle_selected(step)
    }

    /// Selects the track that step toggles edit.
    pub fn select_track(&self, track: Track) {
        self.engine.lock().select_track(track);
    }

    pub fn selected_track(&self) -> Track {
        self.engine.lock().selected_track()
    }

    /// Returns a copy of the track's pattern.
    pub fn pattern(&self, track: Track) -> Pattern {
        self.engine.lock().pattern(track)
    }

    pub fn current_step_index(&self) -> usize {
        self.engine.lock().current_step_index()
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Sets the tempo. A running clock keeps its interval until it is restarted.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<Tempo, SequencerError> {
        self.tempo = Tempo::new(bpm)?;
        info!(tempo = %self.tempo, running = self.is_running(), "Tempo set.");
        Ok(self.tempo)
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Starts the clock at the given tempo. Returns false if it was already running.
    pub fn start_clock(&mut self, bpm: f64) -> Result<bool, SequencerError> {
        let _enter = self.span.enter();
        let step_interval = interval(bpm)?;
        self.tempo = Tempo::new(bpm)?;

        let started = self.clock.start(self.engine.clone(), step_interval);
        if started {
            info!(
                tempo = %self.tempo,
                interval_ms = step_interval.as_secs_f64() * 1000.0,
                step = self.current_step_index(),
                "Playing."
            );
        } else {
            debug!("Clock already running.");
        }
        Ok(started)
    }

    /// Stops the clock. No trigger is issued by the sequencer once this returns.
    /// Returns false if it was not running.
    pub fn stop_clock(&mut self) -> bool {
        let _enter = self.span.enter();
        let stopped = self.clock.stop();
        if stopped {
            info!(step = self.current_step_index(), "Stopped.");
        }
        stopped
    }

    /// Starts the clock at the current tempo if stopped, otherwise stops it. Returns
    /// whether the clock is now running.
    pub fn toggle_playback(&mut self) -> Result<bool, SequencerError> {
        if self.is_running() {
            self.stop_clock();
        } else {
            self.start_clock(self.tempo.bpm())?;
        }
        Ok(self.is_running())
    }

    /// Plays the instrument immediately, as a pad press.
    pub fn play_sample(&self, instrument: Instrument) {
        debug!(%instrument, "Pad pressed.");
        self.trigger.play_sample(instrument);
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("trigger", &self.trigger.to_string())
            .field("tempo", &self.tempo)
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::audio::mock;
    use crate::test::eventually;

    fn create_player() -> (Player, mock::Trigger) {
        let trigger = mock::Trigger::get("mock-player");
        let player = Player::new(Arc::new(trigger.clone()), Tempo::default());
        (player, trigger)
    }

    #[test]
    fn test_toggle_step() {
        let (player, trigger) = create_player();
        assert_eq!(Ok(true), player.toggle_step(Track::Snare, 4));
        assert!(player.pattern(Track::Snare).is_armed(4));
        assert!(!player.pattern(Track::Kick).is_armed(4));
        assert_eq!(Ok(false), player.toggle_step(Track::Snare, 4));

        assert_eq!(
            Err(SequencerError::IndexOutOfRange(16)),
            player.toggle_step(Track::Kick, 16)
        );
        assert_eq!(
            Err(SequencerError::IndexOutOfRange(-1)),
            player.toggle_selected(-1)
        );
        assert_eq!(0, trigger.count());
    }

    #[test]
    fn test_select_and_toggle() {
        let (player, _) = create_player();
        assert_eq!(Track::Kick, player.selected_track());

        player.select_track(Track::ClosedHiHat);
        assert_eq!(Track::ClosedHiHat, player.selected_track());
        assert_eq!(Ok(true), player.toggle_selected(2));
        assert_eq!("..x.............", player.pattern(Track::ClosedHiHat).to_string());
        assert_eq!("................", player.pattern(Track::Kick).to_string());
    }

    #[test]
    fn test_play_sample() {
        let (player, trigger) = create_player();
        player.play_sample(Instrument::Clap);
        player.play_sample(Instrument::Clap);
        assert_eq!(vec![Instrument::Clap, Instrument::Clap], trigger.triggered());
        assert_eq!(0, player.current_step_index());
    }

    #[test]
    fn test_tempo() {
        let (mut player, _) = create_player();
        assert_eq!(120.0, player.tempo().bpm());

        assert!(player.set_tempo(98.0).is_ok());
        assert_eq!(98.0, player.tempo().bpm());

        assert_eq!(
            Err(SequencerError::InvalidTempo(0.0)),
            player.set_tempo(0.0)
        );
        assert_eq!(Err(SequencerError::InvalidTempo(-1.0)), player.start_clock(-1.0));
        assert_eq!(
            Err(SequencerError::InvalidTempo(1e300)),
            player.start_clock(1e300)
        );
        assert!(player.set_tempo(1e-20).is_err());
        assert_eq!(98.0, player.tempo().bpm());
        assert!(!player.is_running());
    }

    #[test]
    fn test_start_and_stop_clock() {
        let (mut player, trigger) = create_player();
        for step in 0..16 {
            player.toggle_step(Track::Kick, step).unwrap();
        }

        // 3000 bpm is a 5ms step.
        assert_eq!(Ok(true), player.start_clock(3000.0));
        assert_eq!(Ok(false), player.start_clock(3000.0));
        eventually(|| trigger.count() >= 4, "Sequencer never triggered");

        assert!(player.stop_clock());
        assert!(!player.stop_clock());
        let count = trigger.count();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(count, trigger.count());
        assert_eq!(count % 16, player.current_step_index());
        assert!(trigger
            .triggered()
            .iter()
            .all(|instrument| *instrument == Instrument::Kick));
    }

    #[test]
    fn test_toggle_playback() {
        let (mut player, trigger) = create_player();
        player.toggle_step(Track::ClosedHiHat, 0).unwrap();
        player.set_tempo(3000.0).unwrap();

        assert_eq!(Ok(true), player.toggle_playback());
        eventually(
            || trigger.count() >= 1,
            "Hi-hat never triggered while playing",
        );
        assert_eq!(Ok(false), player.toggle_playback());
        assert!(!player.is_running());
        assert_eq!(Instrument::ClosedHiHat, trigger.triggered()[0]);
    }
}
