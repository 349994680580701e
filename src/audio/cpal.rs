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
use std::fmt;
use std::thread;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::TrySendError;
use tracing::{error, info, span, warn, Level};

use crate::config;
use crate::playsync::CancelHandle;
use crate::samples::Kit;
use crate::sequencer::Instrument;

use super::SampleTrigger;

/// Device name that selects the host's default output.
const DEFAULT_DEVICE: &str = "default";

/// Pending triggers the output callback has not drained yet. At one trigger per
/// track per step this only fills if the audio callback stalls.
const TRIGGER_QUEUE_SIZE: usize = 64;

/// Describes an output device found while listing hosts.
pub struct DeviceInfo {
    /// The name of the device.
    name: String,
    /// The maximum number of channels the device supports.
    max_channels: u16,
    /// The host ID of the device.
    host_id: cpal::HostId,
}

impl DeviceInfo {
    /// Lists the output devices of every available host.
    pub fn list() -> Result<Vec<DeviceInfo>, Box<dyn Error>> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices: Vec<DeviceInfo> = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            for device in host_devices {
                let Ok(output_configs) = device.supported_output_configs() else {
                    continue;
                };
                let max_channels = output_configs
                    .map(|output_config| output_config.channels())
                    .max()
                    .unwrap_or(0);

                if max_channels > 0 {
                    devices.push(DeviceInfo {
                        name: device.name()?,
                        max_channels,
                        host_id,
                    });
                }
            }
        }

        devices.sort_by_key(|device| device.name.to_string());
        Ok(devices)
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.max_channels,
            self.host_id.name()
        )
    }
}

/// Plays kit samples on a cpal output device.
///
/// The stream is created and owned by a dedicated output thread, since cpal streams
/// can't be moved between threads. Triggers reach the audio callback over a bounded
/// channel so that `play_sample` never blocks the clock.
pub struct Output {
    name: String,
    sample_rate: u32,
    channels: u16,
    trigger_tx: crossbeam_channel::Sender<Instrument>,
    cancel: CancelHandle,
    output_thread: Option<thread::JoinHandle<()>>,
}

impl Output {
    /// Opens the configured device and starts its output stream.
    pub fn open(config: &config::Audio, kit: Kit) -> Result<Output, Box<dyn Error>> {
        let name = config.device().to_string();
        let gain = config.gain();
        let (trigger_tx, trigger_rx) = crossbeam_channel::bounded(TRIGGER_QUEUE_SIZE);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(u32, u16), String>>(1);
        let cancel = CancelHandle::new();

        let thread_name = name.clone();
        let thread_cancel = cancel.clone();
        let output_thread = thread::Builder::new()
            .name("drums808-output".to_string())
            .spawn(move || {
                let span = span!(Level::INFO, "audio output", device = thread_name.as_str());
                let _enter = span.enter();

                let (stream, sample_rate, channels) =
                    match build_stream(&thread_name, &kit, gain, trigger_rx) {
                        Ok(built) => built,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e.to_string()));
                            return;
                        }
                    };
                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(format!("failed to start output stream: {}", e)));
                    return;
                }
                info!(sample_rate, channels, "Output stream started.");
                let _ = ready_tx.send(Ok((sample_rate, channels)));

                // Keep the stream alive until the output is dropped.
                thread_cancel.wait();
                drop(stream);
                info!("Output stream stopped.");
            })?;

        let ready = ready_rx
            .recv()
            .map_err(|_| "output thread exited before the stream started")?;
        let (sample_rate, channels) = match ready {
            Ok(ready) => ready,
            Err(e) => {
                let _ = output_thread.join();
                return Err(e.into());
            }
        };

        Ok(Output {
            name,
            sample_rate,
            channels,
            trigger_tx,
            cancel,
            output_thread: Some(output_thread),
        })
    }
}

/// Finds the named output device, or the host default for "default".
fn find_device(name: &str) -> Result<cpal::Device, Box<dyn Error>> {
    if name == DEFAULT_DEVICE {
        return match cpal::default_host().default_output_device() {
            Some(device) => Ok(device),
            None => Err("no default output device".into()),
        };
    }

    // Suppress noisy output here.
    let _shh_stdout = shh::stdout()?;
    let _shh_stderr = shh::stderr()?;

    for host_id in cpal::available_hosts() {
        let Ok(devices) = cpal::host_from_id(host_id)?.devices() else {
            continue;
        };
        for device in devices {
            if device.name().is_ok_and(|device_name| device_name.trim() == name) {
                return Ok(device);
            }
        }
    }
    Err(format!("no device found with name {}", name).into())
}

/// Builds an f32 output stream that drains triggers and renders the kit's voices.
fn build_stream(
    name: &str,
    kit: &Kit,
    gain: f32,
    trigger_rx: crossbeam_channel::Receiver<Instrument>,
) -> Result<(cpal::Stream, u32, u16), Box<dyn Error>> {
    let device = find_device(name)?;
    let supported = device.default_output_config()?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        return Err(format!(
            "unsupported sample format {}, only f32 output is supported",
            supported.sample_format()
        )
        .into());
    }

    let stream_config: cpal::StreamConfig = supported.config();
    let sample_rate = stream_config.sample_rate;
    let channels = stream_config.channels;
    let mut voices = kit.voices(sample_rate, gain);

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
            while let Ok(instrument) = trigger_rx.try_recv() {
                voices.trigger(instrument);
            }
            voices.render(data, usize::from(channels));
        },
        |err| error!(err = err.to_string(), "Output stream error."),
        None,
    )?;
    Ok((stream, sample_rate, channels))
}

impl SampleTrigger for Output {
    fn play_sample(&self, instrument: Instrument) {
        match self.trigger_tx.try_send(instrument) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(%instrument, "Trigger queue full, dropping trigger.");
            }
            Err(TrySendError::Disconnected(_)) => {
                error!(%instrument, "Output thread has exited, dropping trigger.");
            }
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (SampleRate={}, Channels={}) (cpal)",
            self.name, self.sample_rate, self.channels
        )
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(output_thread) = self.output_thread.take() {
            if output_thread.join().is_err() {
                error!("Output thread panicked.");
            }
        }
    }
}
