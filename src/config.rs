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
use std::path::Path;

use ::config::{Config, Environment, File};
use tracing::debug;

mod audio;
mod error;
mod kit;
mod player;

pub use self::audio::Audio;
pub use self::error::ConfigError;
pub use self::kit::Kit;
pub use self::player::Player;

/// Environment variables with this prefix override values from the config file,
/// e.g. DRUMS808_TEMPO=98 or DRUMS808_AUDIO__DEVICE=mock.
const ENV_PREFIX: &str = "DRUMS808";

/// Loads the player configuration from the given YAML file. A relative kit path
/// is resolved against the directory holding the config file.
pub fn load_player(path: &Path) -> Result<Player, ConfigError> {
    let mut player: Player = Config::builder()
        .add_source(File::from(path))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()?;

    let base_path = path.parent().unwrap_or(Path::new("."));
    player.kit_mut().resolve(base_path);
    player.kit().validate()?;
    // Surface a bad tempo at load time rather than on the first start.
    player.tempo()?;

    debug!(
        path = %path.display(),
        device = player.audio().device(),
        kit = %player.kit().path().display(),
        "Loaded player config."
    );
    Ok(player)
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::PathBuf;

    use ::config::FileFormat;
    use serial_test::serial;

    use super::*;
    use crate::sequencer::{Instrument, SequencerError};

    fn parse(yaml: &str) -> Player {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let player = parse(
            r#"
            kit:
              path: samples
            "#,
        );

        assert_eq!("default", player.audio().device());
        assert!((player.audio().gain() - 0.8).abs() < f32::EPSILON);
        assert_eq!(120.0, player.tempo().unwrap().bpm());
        assert_eq!(
            PathBuf::from("samples/oh75.wav"),
            player.kit().file_for(Instrument::OpenHiHat)
        );
    }

    #[test]
    fn test_full() {
        let player = parse(
            r#"
            audio:
              device: mock-device
              gain: 1.5
            tempo: 98
            kit:
              path: /opt/808
              files:
                kick: kick.wav
            "#,
        );

        assert_eq!("mock-device", player.audio().device());
        assert_eq!(1.0, player.audio().gain());
        assert_eq!(98.0, player.tempo().unwrap().bpm());
        assert_eq!(
            PathBuf::from("/opt/808/kick.wav"),
            player.kit().file_for(Instrument::Kick)
        );
    }

    #[test]
    fn test_invalid_tempo() {
        let player = parse(
            r#"
            tempo: 0
            kit:
              path: samples
            "#,
        );
        assert_eq!(Err(SequencerError::InvalidTempo(0.0)), player.tempo());
    }

    #[test]
    #[serial]
    fn test_load_player() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("drums808.yaml");
        fs::write(
            &path,
            "audio:\n  device: mock\ntempo: 140\nkit:\n  path: kit\n",
        )?;

        let player = load_player(&path)?;
        assert_eq!("mock", player.audio().device());
        assert_eq!(140.0, player.tempo()?.bpm());
        assert_eq!(dir.path().join("kit"), player.kit().path());
        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_player_errors() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;

        let missing = load_player(&dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(ConfigError::Load(_))));

        let path = dir.path().join("bad-tempo.yaml");
        fs::write(&path, "tempo: -10\nkit:\n  path: kit\n")?;
        assert!(matches!(
            load_player(&path),
            Err(ConfigError::Invalid(SequencerError::InvalidTempo(_)))
        ));

        let path = dir.path().join("slow-tempo.yaml");
        fs::write(&path, "tempo: 1e-20\nkit:\n  path: kit\n")?;
        assert!(matches!(
            load_player(&path),
            Err(ConfigError::Invalid(SequencerError::InvalidTempo(_)))
        ));

        let path = dir.path().join("bad-kit.yaml");
        fs::write(&path, "kit:\n  path: kit\n  files:\n    cowbell: cb.wav\n")?;
        assert!(matches!(
            load_player(&path),
            Err(ConfigError::Invalid(SequencerError::UnknownInstrument(_)))
        ));

        let path = dir.path().join("twice.yaml");
        fs::write(
            &path,
            "kit:\n  path: kit\n  files:\n    snare: a.wav\n    \"2\": b.wav\n",
        )?;
        assert!(matches!(
            load_player(&path),
            Err(ConfigError::DuplicateKitFile(_))
        ));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_load_player_env_overrides() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("drums808.yaml");
        fs::write(
            &path,
            "audio:\n  device: default\ntempo: 140\nkit:\n  path: kit\n",
        )?;

        std::env::set_var("DRUMS808_TEMPO", "98");
        std::env::set_var("DRUMS808_AUDIO__DEVICE", "mock-env");
        let player = load_player(&path);
        std::env::remove_var("DRUMS808_TEMPO");
        std::env::remove_var("DRUMS808_AUDIO__DEVICE");

        let player = player?;
        assert_eq!(98.0, player.tempo()?.bpm());
        assert_eq!("mock-env", player.audio().device());
        assert_eq!(dir.path().join("kit"), player.kit().path());

        // Overrides are validated like the file itself.
        std::env::set_var("DRUMS808_TEMPO", "0");
        let result = load_player(&path);
        std::env::remove_var("DRUMS808_TEMPO");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(SequencerError::InvalidTempo(_)))
        ));
        Ok(())
    }
}
