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
use std::error::Error;
use std::io;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{error, info, span, Level};

use crate::player::Player;
use crate::sequencer::{Instrument, SequencerError, Track};

pub mod keyboard;

/// Controller events that will trigger behavior in the player.
#[derive(Debug, PartialEq)]
pub enum Event {
    /// Starts the sequencer if stopped, otherwise stops it.
    Play,

    /// Stops the sequencer. If it isn't running, does nothing.
    Stop,

    /// Toggles the given step of the selected track.
    Toggle(i64),

    /// Toggles the given step of the named track, leaving the selection alone.
    ToggleTrack(String, i64),

    /// Selects the track to edit by name or index.
    Select(String),

    /// Plays an instrument immediately, given by name or pad id.
    Pad(String),

    /// Sets the tempo in beats per minute.
    Tempo(f64),

    /// Reports the selected track, its pattern, the cursor and the tempo.
    Show,
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Drives the player from a driver's events.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Creates a new controller with the given driver.
    pub fn new(player: Player, driver: Arc<dyn Driver>) -> Result<Controller, Box<dyn Error>> {
        Ok(Controller {
            handle: tokio::spawn(async move { Controller::trigger_events(player, driver).await }),
        })
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Triggers player events by watching the driver and getting events from it.
    /// Needs the multi-threaded runtime, as player calls may block briefly.
    async fn trigger_events(mut player: Player, driver: Arc<dyn Driver>) {
        let span = span!(Level::INFO, "controller");
        let _enter = span.enter();

        let (events_tx, mut events_rx) = mpsc::channel(1);
        let join_handle = driver.monitor_events(events_tx);

        info!(tempo = %player.tempo(), "Controller started.");

        while let Some(event) = events_rx.recv().await {
            info!(event = format!("{:?}", event), "Received event.");

            // Stopping the clock joins its thread, which takes at most one tick.
            match tokio::task::block_in_place(|| handle_event(&mut player, event)) {
                Ok(Some(feedback)) => println!("{}", feedback),
                Ok(None) => {}
                Err(e) => error!("Error talking to player: {}", e),
            }
        }

        info!("Controller closing.");
        tokio::task::block_in_place(|| player.stop_clock());
        match join_handle.await {
            Ok(Err(e)) => error!("Event monitor failed: {}", e),
            Err(e) => error!("Error waiting for event monitor to stop: {}", e),
            Ok(Ok(())) => {}
        }
    }
}

/// Applies a single event to the player. Returns the feedback to show the user, if any.
fn handle_event(player: &mut Player, event: Event) -> Result<Option<String>, SequencerError> {
    let feedback = match event {
        Event::Play => {
            let running = player.toggle_playback()?;
            info!(running, "Playback toggled.");
            Some(if running {
                format!("Playing at {} from step {}", player.tempo(), player.current_step_index())
            } else {
                format!("Paused at step {}", player.current_step_index())
            })
        }
        Event::Stop => player
            .stop_clock()
            .then(|| format!("Stopped at step {}", player.current_step_index())),
        Event::Toggle(index) => {
            let armed = player.toggle_selected(index)?;
            Some(toggled(player, player.selected_track(), index, armed))
        }
        Event::ToggleTrack(track, index) => {
            let track: Track = track.parse()?;
            let armed = player.toggle_step(track, index)?;
            Some(toggled(player, track, index, armed))
        }
        Event::Select(track) => {
            let track: Track = track.parse()?;
            player.select_track(track);
            info!(%track, "Track selected.");
            Some(format!("Selected {} [{}]", track, player.pattern(track)))
        }
        Event::Pad(instrument) => {
            let instrument: Instrument = instrument.parse()?;
            player.play_sample(instrument);
            None
        }
        Event::Tempo(bpm) => {
            let tempo = player.set_tempo(bpm)?;
            Some(if player.is_running() {
                format!("Tempo {}, applies on the next play", tempo)
            } else {
                format!("Tempo {}", tempo)
            })
        }
        Event::Show => Some(status(player)),
    };
    Ok(feedback)
}

/// Describes a toggled step along with the track's new pattern.
fn toggled(player: &Player, track: Track, index: i64, armed: bool) -> String {
    info!(%track, step = index, armed, "Step toggled.");
    format!(
        "{} step {} {} [{}]",
        track,
        index,
        if armed { "armed" } else { "cleared" },
        player.pattern(track)
    )
}

/// Describes the player's state for the terminal.
fn status(player: &Player) -> String {
    let track = player.selected_track();
    format!(
        "{} [{}] step {} at {}{}",
        track,
        player.pattern(track),
        player.current_step_index(),
        player.tempo(),
        if player.is_running() { " (playing)" } else { "" }
    )
}
