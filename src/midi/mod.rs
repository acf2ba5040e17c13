//! MIDI output using midir.
//!
//! The device stays usable without a connection: note-ons become
//! no-ops, so the control loop runs identically with or without a
//! MIDI port attached.

use midir::{InitError, MidiOutput, MidiOutputConnection, SendError};
use thiserror::Error;

const CLIENT_NAME: &str = "stepbox MIDI Output";
const STATUS_NOTE_ON: u8 = 0x90;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("failed to create MIDI output: {0}")]
    Init(#[from] InitError),
    #[error("MIDI port index {0} out of range")]
    PortOutOfRange(usize),
    #[error("failed to connect to MIDI port: {0}")]
    Connect(String),
    #[error("failed to send MIDI message: {0}")]
    Send(#[from] SendError),
}

/// Sink for note-on messages.
///
/// There is deliberately no note-off here: the voices are percussive
/// one-shots and the receiving instrument handles decay.
pub trait NoteOutput {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError>;
}

pub struct MidiOutputDevice {
    connection: Option<MidiOutputConnection>,
    channel: u8,
}

impl MidiOutputDevice {
    /// `channel` is 0-indexed: MIDI channel 10 is `9` here.
    pub fn new(channel: u8) -> Self {
        Self {
            connection: None,
            channel: channel & 0x0F,
        }
    }

    pub fn available_ports() -> Vec<String> {
        if let Ok(midi_out) = MidiOutput::new(CLIENT_NAME) {
            midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect()
        } else {
            vec![]
        }
    }

    pub fn connect(&mut self, port_index: usize) -> Result<(), MidiError> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let ports = midi_out.ports();
        let port = ports
            .get(port_index)
            .ok_or(MidiError::PortOutOfRange(port_index))?;
        let connection = midi_out
            .connect(port, "stepbox")
            .map_err(|e| MidiError::Connect(e.to_string()))?;
        self.connection = Some(connection);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn disconnect(&mut self) {
        self.connection = None;
    }
}

impl NoteOutput for MidiOutputDevice {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        if let Some(ref mut conn) = self.connection {
            conn.send(&[STATUS_NOTE_ON | self.channel, note & 0x7F, velocity & 0x7F])?;
        }
        Ok(())
    }
}

pub fn midi_note_name(note: u8) -> String {
    let note_names = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];
    let octave = (note / 12) as i32 - 1;
    let note_index = (note % 12) as usize;
    format!("{}{}", note_names[note_index], octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconnected_device_is_silent_ok() {
        let mut device = MidiOutputDevice::new(9);
        assert!(!device.is_connected());
        assert!(device.note_on(36, 127).is_ok());
    }

    #[test]
    fn test_note_names() {
        assert_eq!(midi_note_name(36), "C2");
        assert_eq!(midi_note_name(38), "D2");
        assert_eq!(midi_note_name(42), "F#2");
        assert_eq!(midi_note_name(46), "A#2");
        assert_eq!(midi_note_name(60), "C4");
        assert_eq!(midi_note_name(0), "C-1");
    }
}
