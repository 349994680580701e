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
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::ConfigError;
use crate::sequencer::Instrument;

/// A YAML representation of the sample kit.
#[derive(Deserialize, Clone, Debug)]
pub struct Kit {
    /// The directory holding the kit's wav files.
    #[serde(default)]
    path: PathBuf,

    /// Per-instrument file overrides, keyed by instrument name.
    #[serde(default)]
    files: HashMap<String, String>,
}

impl Kit {
    /// Creates a kit that uses the stock file names in the given directory.
    pub fn new(path: &Path) -> Kit {
        Kit {
            path: path.to_path_buf(),
            files: HashMap::new(),
        }
    }

    /// Makes a relative kit path relative to the given directory.
    pub(super) fn resolve(&mut self, base_path: &Path) {
        if self.path.is_relative() {
            self.path = base_path.join(&self.path);
        }
    }

    /// Checks that every override names a real instrument, and that no instrument is
    /// overridden twice (e.g. by both "snare" and "2").
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in self.files.keys() {
            let instrument = name.parse::<Instrument>()?;
            if !seen.insert(instrument) {
                return Err(ConfigError::DuplicateKitFile(instrument.to_string()));
            }
        }
        Ok(())
    }

    /// Returns the kit directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the full path of the file to load for the given instrument.
    pub fn file_for(&self, instrument: Instrument) -> PathBuf {
        let file = self
            .files
            .iter()
            .find(|(name, _)| name.parse::<Instrument>().ok() == Some(instrument))
            .map(|(_, file)| file.as_str())
            .unwrap_or(instrument.default_file());
        self.path.join(file)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sequencer::SequencerError;

    #[test]
    fn test_file_for() {
        let mut kit = Kit::new(Path::new("kit"));
        kit.files
            .insert("snare".to_string(), "my-snare.wav".to_string());
        kit.files.insert("6".to_string(), "tom.wav".to_string());

        assert_eq!(PathBuf::from("kit/bd7575.wav"), kit.file_for(Instrument::Kick));
        assert_eq!(
            PathBuf::from("kit/my-snare.wav"),
            kit.file_for(Instrument::Snare)
        );
        assert_eq!(PathBuf::from("kit/tom.wav"), kit.file_for(Instrument::HiTom));
        assert!(kit.validate().is_ok());

        kit.files
            .insert("cowbell".to_string(), "cb.wav".to_string());
        assert!(matches!(
            kit.validate(),
            Err(ConfigError::Invalid(SequencerError::UnknownInstrument(_)))
        ));
    }

    #[test]
    fn test_duplicate_override() {
        let mut kit = Kit::new(Path::new("kit"));
        kit.files
            .insert("snare".to_string(), "snare-a.wav".to_string());
        kit.files.insert("2".to_string(), "snare-b.wav".to_string());

        match kit.validate() {
            Err(ConfigError::DuplicateKitFile(instrument)) => assert_eq!("snare", instrument),
            other => panic!("expected a duplicate kit file error, got {:?}", other),
        }

        kit.files.remove("2");
        kit.files
            .insert(" Snare".to_string(), "snare-b.wav".to_string());
        assert!(matches!(
            kit.validate(),
            Err(ConfigError::DuplicateKitFile(_))
        ));
    }

    #[test]
    fn test_resolve() {
        let mut kit = Kit::new(Path::new("samples"));
        kit.resolve(Path::new("/etc/drums808"));
        assert_eq!(Path::new("/etc/drums808/samples"), kit.path());

        let mut kit = Kit::new(Path::new("/opt/kit"));
        kit.resolve(Path::new("/etc/drums808"));
        assert_eq!(Path::new("/opt/kit"), kit.path());
    }
}
