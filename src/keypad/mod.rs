//! Keypad scanner for a shift-register switch matrix.
//!
//! Each scan latches the switch levels into a parallel-in/serial-out
//! register and clocks them back one key at a time. Events are
//! edge-triggered: a key only produces one against its previous latched
//! state, so a held key is silent until it is released.

use std::collections::VecDeque;
use std::time::Instant;

use crate::hal::{InputLine, OutputLine};

/// Wiring conventions of the switch matrix; deployment constants.
#[derive(Debug, Clone, Copy)]
pub struct KeypadConfig {
    /// Switches wired into the register chain.
    pub key_count: usize,
    /// Data-line level a closed switch reads as.
    pub value_when_pressed: bool,
    /// Level the latch line is pulsed to when sampling the switches.
    pub value_to_latch: bool,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            key_count: 16,
            value_when_pressed: false,
            value_to_latch: false,
        }
    }
}

/// One detected switch transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key index, 0-based in scan order.
    pub key: usize,
    /// true on press, false on release.
    pub pressed: bool,
    /// When the transition was detected.
    pub timestamp: Instant,
}

pub struct KeypadScanner {
    clock: Box<dyn OutputLine>,
    latch: Box<dyn OutputLine>,
    data: Box<dyn InputLine>,
    config: KeypadConfig,
    last: Vec<bool>,
    queue: VecDeque<KeyEvent>,
}

impl KeypadScanner {
    pub fn new(
        clock: impl OutputLine + 'static,
        latch: impl OutputLine + 'static,
        data: impl InputLine + 'static,
        config: KeypadConfig,
    ) -> Self {
        Self {
            clock: Box::new(clock),
            latch: Box::new(latch),
            data: Box::new(data),
            config,
            last: vec![false; config.key_count],
            queue: VecDeque::new(),
        }
    }

    pub fn key_count(&self) -> usize {
        self.config.key_count
    }

    /// Adopt the current switch state as the baseline and drop anything
    /// queued. Call once at startup: switches already closed at power-on
    /// then produce no events until they are released.
    pub fn reset(&mut self) {
        self.last = self.scan();
        self.queue.clear();
    }

    /// Run one scan cycle and return at most one detected transition.
    ///
    /// Transitions found in the same scan are queued in ascending key
    /// order and drained one per call. No transition means `None`.
    pub fn poll(&mut self) -> Option<KeyEvent> {
        let current = self.scan();
        let now = Instant::now();
        for (key, (&was, &is)) in self.last.iter().zip(current.iter()).enumerate() {
            if was != is {
                self.queue.push_back(KeyEvent {
                    key,
                    pressed: is,
                    timestamp: now,
                });
            }
        }
        self.last = current;
        self.queue.pop_front()
    }

    /// Latch the switches, then clock them out; key 0 is read first.
    /// Returns per-key pressed state.
    fn scan(&mut self) -> Vec<bool> {
        self.latch.set(self.config.value_to_latch);
        self.latch.set(!self.config.value_to_latch);
        let mut pressed = Vec::with_capacity(self.config.key_count);
        for _ in 0..self.config.key_count {
            pressed.push(self.data.read() == self.config.value_when_pressed);
            self.clock.set(true);
            self.clock.set(false);
        }
        pressed
    }
}
