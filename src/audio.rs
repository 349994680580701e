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
use std::{error::Error, fmt, sync::Arc};

use crate::config;
use crate::samples::Kit;
use crate::sequencer::Instrument;

pub mod cpal;
pub mod mock;

/// The only call the sequencer makes into the audio subsystem.
///
/// Implementations must be fire-and-forget: the call may not block, and calling it
/// again for an instrument that is still sounding restarts that instrument.
pub trait SampleTrigger: fmt::Display + Send + Sync {
    /// Starts playback of the given instrument's sample.
    fn play_sample(&self, instrument: Instrument);
}

/// Lists the output devices known to cpal.
pub fn list_devices() -> Result<Vec<cpal::DeviceInfo>, Box<dyn Error>> {
    cpal::DeviceInfo::list()
}

/// Gets the trigger for the configured device, loading the kit for it. Devices whose
/// name starts with "mock" never touch the audio hardware and do not load the kit.
pub fn get_trigger(
    config: &config::Audio,
    kit: &config::Kit,
) -> Result<Arc<dyn SampleTrigger>, Box<dyn Error>> {
    let device = config.device();
    if device.starts_with("mock") {
        return Ok(Arc::new(mock::Trigger::get(device)));
    }

    let kit = Kit::load(kit)?;
    Ok(Arc::new(cpal::Output::open(config, kit)?))
}
