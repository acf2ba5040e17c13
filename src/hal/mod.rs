//! Digital line abstractions at the hardware boundary.
//!
//! Pin initialization and bus setup belong to the deployment; the drivers in
//! this crate only toggle and sample lines through these traits. Both traits
//! are infallible: a stuck or disconnected line is undetectable in software.

/// A single digital output line (register clock, data, strobe or latch).
pub trait OutputLine {
    /// Drive the line high (`true`) or low (`false`).
    fn set(&mut self, high: bool);
}

/// A single digital input line (keypad serial data).
pub trait InputLine {
    /// Sample the current line level.
    fn read(&mut self) -> bool;
}
