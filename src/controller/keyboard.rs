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
use std::io;

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{info, span, warn, Level};

use super::Event;

const PLAY: &str = "play";
const STOP: &str = "stop";
const TOGGLE: &str = "toggle";
const SELECT: &str = "select";
const PAD: &str = "pad";
const TEMPO: &str = "tempo";
const SHOW: &str = "show";

/// A controller that controls a player using the keyboard.
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    /// Reads one command and sends its event. Returns false once the input is closed.
    fn monitor_io<R, W>(
        events_tx: &Sender<Event>,
        mut reader: R,
        mut writer: W,
    ) -> Result<bool, io::Error>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(
            writer,
            "Command ({}, {}, {} [track] <step>, {} <track>, {} <instrument>, {} <bpm>, {}): ",
            PLAY, STOP, TOGGLE, SELECT, PAD, TEMPO, SHOW,
        )?;
        writer.flush()?;
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        match Self::parse(&input) {
            Some(event) => events_tx
                .blocking_send(event)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?,
            None => warn!(input = input.trim(), "Unrecognized input"),
        }
        Ok(true)
    }

    /// Parses a command line into an event.
    fn parse(input: &str) -> Option<Event> {
        let input = input.trim().to_lowercase();
        let mut words = input.split_whitespace();
        let command = words.next()?;
        let arguments: Vec<&str> = words.collect();

        match (command, arguments.as_slice()) {
            (PLAY, []) => Some(Event::Play),
            (STOP, []) => Some(Event::Stop),
            (SHOW, []) => Some(Event::Show),
            (TOGGLE, [step]) => Self::parse_step(step).map(Event::Toggle),
            (TOGGLE, [track, step]) => {
                Self::parse_step(step).map(|step| Event::ToggleTrack(track.to_string(), step))
            }
            (SELECT, [track]) => Some(Event::Select(track.to_string())),
            (PAD, [instrument]) => Some(Event::Pad(instrument.to_string())),
            (TEMPO, [bpm]) => bpm.parse().ok().map(Event::Tempo),
            _ => None,
        }
    }

    /// Parses a step number. Numbers too large for an i64 saturate so that they are
    /// reported as out of range rather than as unrecognized input.
    fn parse_step(step: &str) -> Option<i64> {
        let digits = step.strip_prefix('-').unwrap_or(step);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match step.parse() {
            Ok(step) => Some(step),
            Err(_) if step.starts_with('-') => Some(i64::MIN),
            Err(_) => Some(i64::MAX),
        }
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            while Self::monitor_io(&events_tx, io::stdin().lock(), io::stdout())? {}

            info!("Keyboard input closed.");
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, BufReader, BufWriter};

    use tokio::sync::mpsc;

    use crate::controller::Event;

    use super::Driver;

    fn get_event(event: &str) -> Result<Option<Event>, io::Error> {
        let (sender, mut receiver) = mpsc::channel::<Event>(1);

        let reader_bytes = event.as_bytes();
        let reader = BufReader::new(reader_bytes);

        let writer_bytes: Vec<u8> = vec![0; 255];
        let writer = BufWriter::new(writer_bytes);
        assert!(Driver::monitor_io(&sender, reader, writer)?);

        // Force the sender to close.
        drop(sender);
        Ok(receiver.blocking_recv())
    }

    #[test]
    fn test_keyboard_events() -> Result<(), io::Error> {
        assert_eq!(Some(Event::Play), get_event("play\n")?);
        assert_eq!(Some(Event::Stop), get_event("  STOP ")?);
        assert_eq!(Some(Event::Show), get_event("show")?);
        assert_eq!(Some(Event::Toggle(3)), get_event("toggle 3")?);
        assert_eq!(Some(Event::Toggle(-1)), get_event("toggle -1")?);
        assert_eq!(
            Some(Event::ToggleTrack("hihat".to_string(), 15)),
            get_event("toggle hihat 15")?
        );
        assert_eq!(
            Some(Event::Select("snare".to_string())),
            get_event("select Snare")?
        );
        assert_eq!(Some(Event::Pad("7".to_string())), get_event("pad 7")?);
        assert_eq!(Some(Event::Tempo(98.5)), get_event("tempo 98.5")?);
        Ok(())
    }

    #[test]
    fn test_oversized_step() -> Result<(), io::Error> {
        assert_eq!(
            Some(Event::Toggle(i64::MAX)),
            get_event("toggle 99999999999999999999")?
        );
        assert_eq!(
            Some(Event::Toggle(i64::MIN)),
            get_event("toggle -99999999999999999999")?
        );
        assert_eq!(
            Some(Event::ToggleTrack("kick".to_string(), i64::MAX)),
            get_event("toggle kick 99999999999999999999")?
        );
        assert_eq!(None, get_event("toggle 1.5")?);
        assert_eq!(None, get_event("toggle -")?);
        Ok(())
    }

    #[test]
    fn test_unrecognized_input() -> Result<(), io::Error> {
        assert_eq!(None, get_event("unrecognized")?);
        assert_eq!(None, get_event("toggle")?);
        assert_eq!(None, get_event("toggle three")?);
        assert_eq!(None, get_event("play now")?);
        assert_eq!(None, get_event("tempo 120 140")?);
        assert_eq!(None, get_event("toggle snare 1 2")?);
        assert_eq!(None, get_event("\n")?);
        Ok(())
    }

    #[test]
    fn test_end_of_input() -> Result<(), io::Error> {
        let (sender, _receiver) = mpsc::channel::<Event>(1);
        let writer = BufWriter::new(Vec::new());
        assert!(!Driver::monitor_io(&sender, BufReader::new("".as_bytes()), writer)?);
        Ok(())
    }
}
