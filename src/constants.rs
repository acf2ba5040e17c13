//! Compiled-in deployment configuration.
//!
//! There is no CLI, no config file and no environment lookup: the voice
//! count, step count, tempo, pitch table and wiring conventions are fixed
//! at build time and threaded into the components by whoever composes them.

use std::time::Duration;

// sequencer
/// Steps per pattern cycle (16th notes).
pub const STEP_COUNT: usize = 16;
/// Voices in the pattern grid.
pub const VOICE_COUNT: usize = 4;
/// Transport tempo in beats per minute.
pub const BPM: f32 = 60.0;
/// The voice every keypad edit is applied to.
pub const INPUT_VOICE: usize = 0;

// LED column (serial-in/parallel-out register chain)
/// Bytes in the output register chain; 8 LEDs per byte.
pub const LED_REGISTER_BYTES: usize = 2;
/// Minimum strobe high time required by the register family to latch.
pub const STROBE_HOLD: Duration = Duration::from_micros(10);

// keypad (parallel-in/serial-out register matrix)
/// Switches wired into the input register chain.
pub const KEY_COUNT: usize = 16;
/// A closed switch pulls the serial data line low.
pub const VALUE_WHEN_PRESSED: bool = false;
/// Level the latch line is pulsed to when sampling the switches.
pub const VALUE_TO_LATCH: bool = false;

// MIDI
/// 1-based output channel; the wire channel is this minus one.
pub const MIDI_OUT_CHANNEL: u8 = 10;
/// Velocity for every note-on trigger.
pub const NOTE_VELOCITY: u8 = 127;
/// Voice → pitch table: bass drum, snare, closed hat, open hat.
pub const VOICE_NOTES: [u8; VOICE_COUNT] = [36, 38, 42, 46];
