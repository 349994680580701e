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

use thread_priority::{set_current_thread_priority, ThreadPriority, ThreadPriorityValue};
use tracing::{debug, warn};

/// Default priority for the clock thread when DRUMS808_THREAD_PRIORITY is unset.
const DEFAULT_CLOCK_THREAD_PRIORITY: u8 = 70;

/// Reads DRUMS808_THREAD_PRIORITY (0-99), falling back to the default on bad input.
pub fn clock_thread_priority() -> ThreadPriorityValue {
    std::env::var("DRUMS808_THREAD_PRIORITY")
        .ok()
        .and_then(|v| parse_priority(&v))
        .unwrap_or_else(default_priority)
}

fn parse_priority(value: &str) -> Option<ThreadPriorityValue> {
    let n = value.trim().parse::<u8>().ok()?;
    if n < 100 {
        ThreadPriorityValue::try_from(n).ok()
    } else {
        None
    }
}

fn default_priority() -> ThreadPriorityValue {
    ThreadPriorityValue::try_from(DEFAULT_CLOCK_THREAD_PRIORITY)
        .expect("default clock thread priority is within 0-99")
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| {
            v == "1"
                || v.eq_ignore_ascii_case("true")
                || v.eq_ignore_ascii_case("yes")
                || v.eq_ignore_ascii_case("on")
        })
        .unwrap_or(false)
}

/// Returns whether we should attempt RT (SCHED_FIFO) scheduling for the clock thread.
/// Default: enabled. Opt out with DRUMS808_DISABLE_RT_CLOCK=1.
pub fn rt_clock_enabled() -> bool {
    !env_flag("DRUMS808_DISABLE_RT_CLOCK")
}

/// Raises the priority of the calling thread. Failures are logged and otherwise
/// ignored: the clock still runs, just with more jitter.
pub fn configure_clock_thread_priority(priority: ThreadPriorityValue, rt: bool) {
    let tp = ThreadPriority::Crossplatform(priority);
    if let Err(e) = set_current_thread_priority(tp) {
        debug!(error = ?e, "Unable to raise clock thread priority");
    }

    #[cfg(unix)]
    if rt {
        use thread_priority::unix::{
            set_thread_priority_and_policy, thread_native_id, RealtimeThreadSchedulePolicy,
            ThreadSchedulePolicy,
        };
        let tid = thread_native_id();
        match set_thread_priority_and_policy(
            tid,
            tp,
            ThreadSchedulePolicy::Realtime(RealtimeThreadSchedulePolicy::Fifo),
        ) {
            Ok(()) => debug!("Enabled RT SCHED_FIFO for clock thread"),
            Err(e) => warn!(error = %e, "Failed to set RT SCHED_FIFO for clock thread"),
        }
    }

    #[cfg(not(unix))]
    let _ = rt;
}
