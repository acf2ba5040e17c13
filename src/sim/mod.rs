//! Line-level simulations of the instrument's hardware.
//!
//! These model the two register chains at the signal level (shift on
//! clock rising edge, latch on strobe/latch edge), so the drivers'
//! actual bit-banging is what gets exercised. Used by the tests and by
//! the demo binary, which runs the full loop against simulated pins.

use std::sync::{Arc, Mutex};

use crate::hal::{InputLine, OutputLine};
use crate::keypad::KeypadConfig;
use crate::midi::{MidiError, NoteOutput};

#[derive(Debug, Clone, Copy)]
enum ChainRole {
    Clock,
    Data,
    Strobe,
}

/// Serial-in/parallel-out chain driving the LEDs.
struct ChainState {
    stages: Vec<bool>,
    latched: Vec<bool>,
    data: bool,
    clock: bool,
    strobe: bool,
}

impl ChainState {
    fn drive(&mut self, role: ChainRole, high: bool) {
        match role {
            ChainRole::Data => self.data = high,
            ChainRole::Clock => {
                if high && !self.clock {
                    // rising edge: the data level enters stage 0 and
                    // everything older shifts one stage down the chain
                    let cap = self.stages.len();
                    self.stages.insert(0, self.data);
                    self.stages.truncate(cap);
                }
                self.clock = high;
            }
            ChainRole::Strobe => {
                if high && !self.strobe {
                    self.latched = self.stages.clone();
                }
                self.strobe = high;
            }
        }
    }
}

pub struct LedChain {
    state: Arc<Mutex<ChainState>>,
}

impl LedChain {
    pub fn new(bytes: usize) -> Self {
        let bits = bytes * 8;
        Self {
            state: Arc::new(Mutex::new(ChainState {
                stages: vec![false; bits],
                latched: vec![false; bits],
                data: false,
                clock: false,
                strobe: false,
            })),
        }
    }

    pub fn clock_line(&self) -> ChainLine {
        self.line(ChainRole::Clock)
    }

    pub fn data_line(&self) -> ChainLine {
        self.line(ChainRole::Data)
    }

    pub fn strobe_line(&self) -> ChainLine {
        self.line(ChainRole::Strobe)
    }

    fn line(&self, role: ChainRole) -> ChainLine {
        ChainLine {
            state: Arc::clone(&self.state),
            role,
        }
    }

    /// Latched state of LED `i`, where `i` is the driver's bit index:
    /// the first bit shifted out lands at the far end of the chain.
    pub fn led(&self, i: usize) -> bool {
        let state = self.state.lock().unwrap();
        let cap = state.latched.len();
        if i >= cap {
            return false;
        }
        state.latched[cap - 1 - i]
    }

    /// All latched LED states in driver bit order.
    pub fn latched(&self) -> Vec<bool> {
        let state = self.state.lock().unwrap();
        let cap = state.latched.len();
        (0..cap).map(|i| state.latched[cap - 1 - i]).collect()
    }
}

pub struct ChainLine {
    state: Arc<Mutex<ChainState>>,
    role: ChainRole,
}

impl OutputLine for ChainLine {
    fn set(&mut self, high: bool) {
        self.state.lock().unwrap().drive(self.role, high);
    }
}

#[derive(Debug, Clone, Copy)]
enum MatrixRole {
    Clock,
    Latch,
}

/// Parallel-in/serial-out chain reading the key switches.
struct MatrixState {
    switches: Vec<bool>,
    snapshot: Vec<bool>,
    pos: usize,
    clock: bool,
    latch: bool,
    value_when_pressed: bool,
    value_to_latch: bool,
}

impl MatrixState {
    fn drive(&mut self, role: MatrixRole, high: bool) {
        match role {
            MatrixRole::Latch => {
                if high == self.value_to_latch && self.latch != high {
                    self.snapshot = self.switches.clone();
                    self.pos = 0;
                }
                self.latch = high;
            }
            MatrixRole::Clock => {
                if high && !self.clock {
                    self.pos += 1;
                }
                self.clock = high;
            }
        }
    }

    fn data_level(&self) -> bool {
        let closed = self.snapshot.get(self.pos).copied().unwrap_or(false);
        if closed {
            self.value_when_pressed
        } else {
            !self.value_when_pressed
        }
    }
}

pub struct KeyMatrix {
    state: Arc<Mutex<MatrixState>>,
}

impl KeyMatrix {
    pub fn new(config: KeypadConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(MatrixState {
                switches: vec![false; config.key_count],
                snapshot: vec![false; config.key_count],
                pos: 0,
                clock: false,
                latch: !config.value_to_latch,
                value_when_pressed: config.value_when_pressed,
                value_to_latch: config.value_to_latch,
            })),
        }
    }

    pub fn press(&self, key: usize) {
        self.set_switch(key, true);
    }

    pub fn release(&self, key: usize) {
        self.set_switch(key, false);
    }

    fn set_switch(&self, key: usize, closed: bool) {
        let mut state = self.state.lock().unwrap();
        if let Some(switch) = state.switches.get_mut(key) {
            *switch = closed;
        }
    }

    pub fn clock_line(&self) -> MatrixLine {
        MatrixLine {
            state: Arc::clone(&self.state),
            role: MatrixRole::Clock,
        }
    }

    pub fn latch_line(&self) -> MatrixLine {
        MatrixLine {
            state: Arc::clone(&self.state),
            role: MatrixRole::Latch,
        }
    }

    pub fn data_line(&self) -> MatrixDataLine {
        MatrixDataLine {
            state: Arc::clone(&self.state),
        }
    }
}

pub struct MatrixLine {
    state: Arc<Mutex<MatrixState>>,
    role: MatrixRole,
}

impl OutputLine for MatrixLine {
    fn set(&mut self, high: bool) {
        self.state.lock().unwrap().drive(self.role, high);
    }
}

pub struct MatrixDataLine {
    state: Arc<Mutex<MatrixState>>,
}

impl InputLine for MatrixDataLine {
    fn read(&mut self) -> bool {
        self.state.lock().unwrap().data_level()
    }
}

/// Note sink that records every note-on for assertions.
#[derive(Clone, Default)]
pub struct NoteRecorder {
    notes: Arc<Mutex<Vec<(u8, u8)>>>,
}

impl NoteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> Vec<(u8, u8)> {
        self.notes.lock().unwrap().clone()
    }
}

impl NoteOutput for NoteRecorder {
    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        self.notes.lock().unwrap().push((note, velocity));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_latches_only_on_strobe() {
        let chain = LedChain::new(1);
        let mut clock = chain.clock_line();
        let mut data = chain.data_line();
        let mut strobe = chain.strobe_line();

        data.set(true);
        clock.set(true);
        clock.set(false);
        // shifted but not strobed: outputs unchanged
        assert_eq!(chain.latched(), vec![false; 8]);

        strobe.set(true);
        strobe.set(false);
        assert!(chain.latched().contains(&true));
    }

    #[test]
    fn test_matrix_snapshot_is_stable_between_latches() {
        let config = KeypadConfig {
            key_count: 4,
            ..KeypadConfig::default()
        };
        let matrix = KeyMatrix::new(config);
        let mut clock = matrix.clock_line();
        let mut latch = matrix.latch_line();
        let mut data = matrix.data_line();

        latch.set(config.value_to_latch);
        latch.set(!config.value_to_latch);
        // closing a switch mid-readout must not affect this snapshot
        matrix.press(0);
        assert_eq!(data.read(), !config.value_when_pressed);

        latch.set(config.value_to_latch);
        latch.set(!config.value_to_latch);
        assert_eq!(data.read(), config.value_when_pressed);
        clock.set(true);
        clock.set(false);
        assert_eq!(data.read(), !config.value_when_pressed);
    }
}
