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

//! The repeating timer that drives the sequencer. It has two states, stopped and
//! running, and can be restarted any number of times.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error, info, span, warn, Level};

use super::engine::SequencerEngine;
use super::thread_priority;
use crate::playsync::CancelHandle;

/// How long before a deadline the clock stops blocking and starts spinning.
const SPIN_WINDOW: Duration = Duration::from_millis(1);

struct ClockHandles {
    cancel: CancelHandle,
    join: JoinHandle<()>,
}

/// Calls `SequencerEngine::advance` once per interval on a dedicated thread.
#[derive(Default)]
pub struct Clock {
    /// Present while the clock is running.
    running: Option<ClockHandles>,
}

impl Clock {
    /// Creates a stopped clock.
    pub fn new() -> Clock {
        Clock { running: None }
    }

    /// Returns true if the clock is ticking.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Starts ticking. The first tick happens one interval from now. Returns false
    /// and does nothing if the clock is already running.
    pub fn start(&mut self, engine: Arc<Mutex<SequencerEngine>>, interval: Duration) -> bool {
        if self.running.is_some() {
            debug!("Clock is already running.");
            return false;
        }

        info!(interval = ?interval, "Starting clock.");
        let cancel = CancelHandle::new();
        let join = {
            let cancel = cancel.clone();
            thread::spawn(move || Clock::run(engine, interval, cancel))
        };
        self.running = Some(ClockHandles { cancel, join });
        true
    }

    /// Stops ticking. When this returns, the clock thread has exited and no
    /// further samples will be triggered by it. The engine's cursor is left where it
    /// was. Must not be called while holding the engine lock.
    ///
    /// Returns false if the clock was not running.
    pub fn stop(&mut self) -> bool {
        let Some(handles) = self.running.take() else {
            return false;
        };

        handles.cancel.cancel();
        if handles.join.join().is_err() {
            error!("Clock thread panicked.");
        }
        info!("Clock stopped.");
        true
    }

    fn run(engine: Arc<Mutex<SequencerEngine>>, interval: Duration, cancel: CancelHandle) {
        let span = span!(Level::INFO, "clock");
        let _enter = span.enter();

        thread_priority::configure_clock_thread_priority(
            thread_priority::clock_thread_priority(),
            thread_priority::rt_clock_enabled(),
        );

        let mut next_tick = Instant::now() + interval;
        loop {
            if Clock::wait_until(&cancel, next_tick) {
                return;
            }

            {
                let mut engine = engine.lock();
                // A stop may have landed while we were waiting on the lock.
                if cancel.is_cancelled() {
                    return;
                }
                let step = engine.advance();
                debug!(step, "Tick");
            }

            next_tick += interval;
            let now = Instant::now();
            if now > next_tick {
                warn!(
                    behind = ?now.duration_since(next_tick),
                    "Clock fell behind, skipping missed steps"
                );
                next_tick = now + interval;
            }
        }
    }

    /// Sleeps until the deadline. Returns true if the clock was cancelled instead.
    fn wait_until(cancel: &CancelHandle, deadline: Instant) -> bool {
        let coarse = deadline
            .saturating_duration_since(Instant::now())
            .saturating_sub(SPIN_WINDOW);
        if !coarse.is_zero() && cancel.wait_timeout(coarse) {
            return true;
        }

        spin_sleep::sleep(deadline.saturating_duration_since(Instant::now()));
        cancel.is_cancelled()
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.stop();
    }
}
