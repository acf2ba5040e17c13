//! Note dispatch for one step column.

use log::{debug, warn};

use crate::midi::NoteOutput;
use crate::sequencer::Pattern;

pub struct NoteDispatcher {
    pitches: Vec<u8>,
    velocity: u8,
    out: Box<dyn NoteOutput>,
}

impl NoteDispatcher {
    /// `pitches[voice]` is the note sent when that voice is active.
    pub fn new(pitches: Vec<u8>, velocity: u8, out: impl NoteOutput + 'static) -> Self {
        Self {
            pitches,
            velocity,
            out: Box::new(out),
        }
    }

    /// Send a note-on for every voice active at `step`, in ascending
    /// voice order. A failed send is logged and skipped; the other
    /// voices still fire.
    pub fn dispatch(&mut self, pattern: &Pattern, step: usize) {
        for voice in pattern.voices() {
            if !pattern.get(voice, step) {
                continue;
            }
            match self.pitches.get(voice) {
                Some(&note) => {
                    if let Err(err) = self.out.note_on(note, self.velocity) {
                        warn!("note-on for voice {voice} failed: {err}");
                    }
                }
                None => debug!("voice {voice} has no pitch mapping"),
            }
        }
    }
}
