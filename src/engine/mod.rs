//! The control loop.
//!
//! Single-threaded: each pass renders the playhead onto the LED chain,
//! fires the current step's voices, advances the clock once its
//! interval has elapsed, and folds at most one keypad event into the
//! pattern. The loop never blocks on any one of these.

use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::engine::dispatch::NoteDispatcher;
use crate::keypad::KeypadScanner;
use crate::sequencer::clock::StepClock;
use crate::sequencer::Pattern;
use crate::shift::ShiftRegister;

pub mod dispatch;

const POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct Engine {
    pattern: Pattern,
    clock: StepClock,
    leds: ShiftRegister,
    keys: KeypadScanner,
    dispatcher: NoteDispatcher,
    input_voice: usize,
    last_dispatched: Option<u64>,
}

impl Engine {
    /// Takes ownership of every part of the instrument. The keypad is
    /// reset here so switches held during startup produce no events.
    pub fn new(
        pattern: Pattern,
        clock: StepClock,
        leds: ShiftRegister,
        mut keys: KeypadScanner,
        dispatcher: NoteDispatcher,
        input_voice: usize,
    ) -> Self {
        assert!(pattern.step_count() > 0, "pattern needs at least one step");
        assert!(
            input_voice < pattern.voice_count(),
            "input voice {input_voice} out of range"
        );
        keys.reset();
        Self {
            pattern,
            clock,
            leds,
            keys,
            dispatcher,
            input_voice,
            last_dispatched: None,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// One pass of the loop. `now` is taken as a parameter so tests can
    /// drive time explicitly.
    pub fn tick(&mut self, now: Instant) {
        let step = (self.clock.step() % self.pattern.step_count() as u64) as usize;

        // playhead: light the current step and push the whole chain out
        self.leds.set_bit(step, true);
        self.leds.flush();

        // fire this column exactly once per step, no matter how many
        // passes happen before the next advance
        if self.last_dispatched != Some(self.clock.step()) {
            self.dispatcher.dispatch(&self.pattern, step);
            self.last_dispatched = Some(self.clock.step());
        }

        // the cleared bit reaches the LEDs on the next pass's flush
        if self.clock.maybe_advance(now) {
            self.leds.set_bit(step, false);
        }

        if let Some(event) = self.keys.poll() {
            debug!("keypad event: {event:?}");
            if event.key < self.pattern.step_count() {
                self.pattern.set(self.input_voice, event.key, event.pressed);
                debug!("pattern updated:\n{}", self.pattern);
            }
        }
    }

    /// Run forever. The sleep keeps the pass rate well under the step
    /// interval without pinning a core.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick(Instant::now());
            thread::sleep(POLL_INTERVAL);
        }
    }
}
