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
mod audio;
mod config;
mod controller;
mod player;
mod playsync;
mod samples;
mod sequencer;
#[cfg(test)]
mod test;

use clap::{crate_version, Parser, Subcommand};
use controller::Controller;
use player::Player;
use sequencer::Instrument;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "An 808 style drum sampler with a 16 step sequencer."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available audio output devices.
    Devices {},
    /// Loads and lists the sample kit from the given player config.
    Kit {
        /// The path to the player config.
        player_path: String,
    },
    /// Start will start the drum sampler, controlled from the keyboard.
    Start {
        /// The path to the player config.
        player_path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Devices {} => {
            let devices = audio::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Kit { player_path } => {
            let player_config = config::load_player(&PathBuf::from(&player_path))?;
            let kit = samples::Kit::load(player_config.kit())?;

            println!("Kit ({}):", player_config.kit().path().display());
            for instrument in Instrument::ALL {
                let sample = kit.sample(instrument);
                println!(
                    "- {} {}: {} ({} Hz, {} ms)",
                    instrument.id(),
                    instrument,
                    player_config.kit().file_for(instrument).display(),
                    sample.sample_rate(),
                    sample.duration().as_millis()
                );
            }
        }
        Commands::Start { player_path } => {
            let player_config = config::load_player(&PathBuf::from(&player_path))?;
            let trigger = audio::get_trigger(player_config.audio(), player_config.kit())?;
            let player = Player::new(trigger, player_config.tempo()?);

            let driver = Arc::new(controller::keyboard::Driver::new());
            let mut controller = Controller::new(player, driver)?;
            controller.join().await?;
        }
    }

    Ok(())
}
