//! Pattern state for the sequencer.
//!
//! A pattern is a fixed grid of on/off flags, one row per voice and one
//! column per step. Which pitch a voice maps to is not the pattern's
//! business; dispatch owns that table.

use std::fmt;
use std::ops::Range;

pub mod clock;

#[derive(Debug, Clone)]
pub struct Pattern {
    flags: Vec<Vec<bool>>,
    voice_count: usize,
    step_count: usize,
}

impl Pattern {
    /// All flags start false.
    pub fn new(voice_count: usize, step_count: usize) -> Self {
        Self {
            flags: vec![vec![false; step_count]; voice_count],
            voice_count,
            step_count,
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voice_count
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Voice ids in ascending order, the order dispatch walks them.
    pub fn voices(&self) -> Range<usize> {
        0..self.voice_count
    }

    /// Out-of-range reads as false.
    pub fn get(&self, voice: usize, step: usize) -> bool {
        self.flags
            .get(voice)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    /// Out-of-range is a no-op in release builds.
    pub fn set(&mut self, voice: usize, step: usize, active: bool) {
        debug_assert!(
            voice < self.voice_count && step < self.step_count,
            "pattern index out of range: voice {voice}, step {step}"
        );
        if let Some(row) = self.flags.get_mut(voice) {
            if let Some(flag) = row.get_mut(step) {
                *flag = active;
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for voice in self.voices() {
            if voice > 0 {
                writeln!(f)?;
            }
            write!(f, "Voice {voice}: ")?;
            for step in 0..self.step_count {
                f.write_str(if self.get(voice, step) { "X" } else { "." })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pattern_is_empty() {
        let pattern = Pattern::new(4, 16);
        assert_eq!(pattern.voice_count(), 4);
        assert_eq!(pattern.step_count(), 16);
        for voice in pattern.voices() {
            for step in 0..pattern.step_count() {
                assert!(!pattern.get(voice, step));
            }
        }
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut pattern = Pattern::new(4, 16);
        pattern.set(2, 7, true);
        assert!(pattern.get(2, 7));
        assert!(!pattern.get(2, 6));
        assert!(!pattern.get(1, 7));
        pattern.set(2, 7, false);
        assert!(!pattern.get(2, 7));
    }

    #[test]
    fn test_out_of_range_get_is_false() {
        let pattern = Pattern::new(4, 16);
        assert!(!pattern.get(4, 0));
        assert!(!pattern.get(0, 16));
        assert!(!pattern.get(99, 99));
    }

    #[test]
    fn test_voices_ascending() {
        let pattern = Pattern::new(4, 16);
        let order: Vec<usize> = pattern.voices().collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_display_shape() {
        let mut pattern = Pattern::new(2, 4);
        pattern.set(0, 1, true);
        pattern.set(1, 3, true);
        assert_eq!(pattern.to_string(), "Voice 0: .X..\nVoice 1: ...X");
    }
}
