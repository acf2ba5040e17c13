use std::time::Instant;

use log::{info, warn};

use stepbox::constants::{
    BPM, INPUT_VOICE, KEY_COUNT, LED_REGISTER_BYTES, MIDI_OUT_CHANNEL, NOTE_VELOCITY, STEP_COUNT,
    STROBE_HOLD, VALUE_TO_LATCH, VALUE_WHEN_PRESSED, VOICE_COUNT, VOICE_NOTES,
};
use stepbox::sim::{KeyMatrix, LedChain};
use stepbox::{
    midi_note_name, Engine, KeypadConfig, KeypadScanner, MidiOutputDevice, NoteDispatcher,
    Pattern, ShiftRegister, StepClock,
};

fn main() {
    env_logger::init();

    let config = KeypadConfig {
        key_count: KEY_COUNT,
        value_when_pressed: VALUE_WHEN_PRESSED,
        value_to_latch: VALUE_TO_LATCH,
    };

    // simulated pins; a deployment swaps in real line implementations
    let chain = LedChain::new(LED_REGISTER_BYTES);
    let matrix = KeyMatrix::new(config);

    let mut leds = ShiftRegister::new(
        chain.clock_line(),
        chain.data_line(),
        chain.strobe_line(),
        LED_REGISTER_BYTES,
    );
    leds.set_strobe_hold(STROBE_HOLD);
    let keys = KeypadScanner::new(
        matrix.clock_line(),
        matrix.latch_line(),
        matrix.data_line(),
        config,
    );

    let mut midi = MidiOutputDevice::new(MIDI_OUT_CHANNEL - 1);
    let ports = MidiOutputDevice::available_ports();
    match ports.first() {
        Some(name) => match midi.connect(0) {
            Ok(()) => info!("MIDI output on '{name}', channel {MIDI_OUT_CHANNEL}"),
            Err(err) => warn!("MIDI connect failed ({err}); running silent"),
        },
        None => info!("no MIDI output ports; running silent"),
    }
    for (voice, &note) in VOICE_NOTES.iter().enumerate() {
        info!("voice {voice} -> note {note} ({})", midi_note_name(note));
    }

    let dispatcher = NoteDispatcher::new(VOICE_NOTES.to_vec(), NOTE_VELOCITY, midi);
    let pattern = Pattern::new(VOICE_COUNT, STEP_COUNT);
    let clock = StepClock::new(BPM, Instant::now());
    let mut engine = Engine::new(pattern, clock, leds, keys, dispatcher, INPUT_VOICE);

    // four-on-the-floor starter beat on the input voice
    for key in [0, 4, 8, 12] {
        matrix.press(key);
    }

    info!("running at {BPM} bpm, {STEP_COUNT} steps");
    engine.run();
}
