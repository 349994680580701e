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
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Represents the current cancel state.
#[derive(PartialEq)]
enum CancelState {
    Untouched,
    Cancelled,
}

/// A cancel handle is shared with a background thread. It's the thread's responsibility
/// to respect a cancel request.
#[derive(Clone)]
pub struct CancelHandle {
    /// Set to cancelled when the underlying operation should stop.
    cancelled: Arc<Mutex<CancelState>>,
    /// The condvar will handle notification of cancelling.
    condvar: Arc<Condvar>,
}

impl CancelHandle {
    /// Creates a new cancel handle.
    pub fn new() -> CancelHandle {
        CancelHandle {
            cancelled: Arc::new(Mutex::new(CancelState::Untouched)),
            condvar: Arc::new(Condvar::new()),
        }
    }

    /// Returns true if the operation has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.lock().expect("Error getting lock") == CancelState::Cancelled
    }

    /// Blocks until the handle is cancelled.
    pub fn wait(&self) {
        let _unused = self
            .condvar
            .wait_while(
                self.cancelled.lock().expect("Error getting lock"),
                |cancelled| *cancelled == CancelState::Untouched,
            )
            .expect("Error getting lock");
    }

    /// Blocks until the handle is cancelled or the timeout elapses. Returns true if
    /// the handle was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (cancelled, _) = self
            .condvar
            .wait_timeout_while(
                self.cancelled.lock().expect("Error getting lock"),
                timeout,
                |cancelled| *cancelled == CancelState::Untouched,
            )
            .expect("Error getting lock");
        *cancelled == CancelState::Cancelled
    }

    /// Cancel the operation and wake up anyone waiting on it.
    pub fn cancel(&self) {
        let mut cancel_state = self.cancelled.lock().expect("Error getting lock");
        if *cancel_state == CancelState::Untouched {
            *cancel_state = CancelState::Cancelled;
            self.condvar.notify_all();
        }
    }
}

#[cfg(test)]
mod test {
    use std::thread;
    use std::time::Instant;

    use super::*;

    #[test]
    fn test_cancel_handle_cancelled() {
        let cancel_handle = CancelHandle::new();
        assert!(!cancel_handle.is_cancelled());

        let join = {
            let cancel_handle = cancel_handle.clone();
            thread::spawn(move || cancel_handle.wait())
        };

        cancel_handle.cancel();
        assert!(join.join().is_ok());
        assert!(cancel_handle.is_cancelled());
    }

    #[test]
    fn test_wait_timeout_expires() {
        let cancel_handle = CancelHandle::new();

        let start = Instant::now();
        assert!(!cancel_handle.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert!(!cancel_handle.is_cancelled());
    }

    #[test]
    fn test_wait_timeout_cancelled() {
        let cancel_handle = CancelHandle::new();

        let join = {
            let cancel_handle = cancel_handle.clone();
            thread::spawn(move || cancel_handle.wait_timeout(Duration::from_secs(30)))
        };

        cancel_handle.cancel();
        assert!(join.join().expect("wait thread should join"));

        // Once cancelled, waits return immediately.
        assert!(cancel_handle.wait_timeout(Duration::from_secs(30)));
    }
}
