/// stepbox - a shift-register step sequencer
///
/// This library provides the components of a hardware drum sequencer:
/// - Pattern grid holding per-voice step flags
/// - Shift-register drivers for the LED playhead and the key matrix
/// - Step clock and note dispatch for timing and MIDI output
/// - A single-threaded engine tying the loop together
/// - Line-level hardware simulations for tests and the demo binary

pub mod constants;
pub mod engine;
pub mod hal;
pub mod keypad;
pub mod midi;
pub mod sequencer;
pub mod shift;
pub mod sim;

// Re-export commonly used types
pub use engine::dispatch::NoteDispatcher;
pub use engine::Engine;
pub use keypad::{KeyEvent, KeypadConfig, KeypadScanner};
pub use midi::{midi_note_name, MidiError, MidiOutputDevice, NoteOutput};
pub use sequencer::clock::{step_interval_ms, StepClock};
pub use sequencer::Pattern;
pub use shift::ShiftRegister;
