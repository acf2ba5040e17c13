//! Step timing.
//!
//! The clock counts 16th notes: four steps per beat, so the interval
//! between steps is `60000 / bpm / 4` milliseconds. The step counter
//! only ever increments; callers index their pattern with
//! `step % step_count`.

use std::time::{Duration, Instant};

const MIN_BPM: f32 = 40.0;
const MAX_BPM: f32 = 240.0;

/// Milliseconds between 16th-note steps at the given tempo.
pub fn step_interval_ms(bpm: f32) -> u64 {
    (60_000.0 / bpm / 4.0) as u64
}

fn step_interval(bpm: f32) -> Duration {
    Duration::from_millis(step_interval_ms(bpm))
}

pub struct StepClock {
    bpm: f32,
    step: u64,
    last_tick: Instant,
}

impl StepClock {
    pub fn new(bpm: f32, now: Instant) -> Self {
        Self {
            bpm: bpm.clamp(MIN_BPM, MAX_BPM),
            step: 0,
            last_tick: now,
        }
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    /// Steps taken since construction. Monotonic, never wraps back.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Advance to the next step if a full interval has elapsed.
    ///
    /// The interval is recomputed from the current tempo on every
    /// check, so a tempo change takes effect at the next step.
    pub fn maybe_advance(&mut self, now: Instant) -> bool {
        if now >= self.last_tick + step_interval(self.bpm) {
            self.last_tick = now;
            self.step += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_interval_formula() {
        assert_eq!(step_interval_ms(60.0), 250);
        assert_eq!(step_interval_ms(120.0), 125);
        assert_eq!(step_interval_ms(90.0), 166);
    }

    #[test]
    fn test_no_advance_before_interval() {
        let start = Instant::now();
        let mut clock = StepClock::new(60.0, start);
        assert!(!clock.maybe_advance(start));
        assert!(!clock.maybe_advance(start + Duration::from_millis(249)));
        assert_eq!(clock.step(), 0);
    }

    #[test]
    fn test_advance_at_interval() {
        let start = Instant::now();
        let mut clock = StepClock::new(60.0, start);
        assert!(clock.maybe_advance(start + Duration::from_millis(250)));
        assert_eq!(clock.step(), 1);
        // interval restarts from the advance
        assert!(!clock.maybe_advance(start + Duration::from_millis(499)));
        assert!(clock.maybe_advance(start + Duration::from_millis(500)));
        assert_eq!(clock.step(), 2);
    }

    #[test]
    fn test_step_counter_is_monotonic() {
        let start = Instant::now();
        let mut clock = StepClock::new(120.0, start);
        let mut now = start;
        for _ in 0..20 {
            now += Duration::from_millis(125);
            assert!(clock.maybe_advance(now));
        }
        assert_eq!(clock.step(), 20);
        assert_eq!(clock.step() as usize % 16, 4);
    }

    #[test]
    fn test_bpm_is_clamped() {
        let start = Instant::now();
        let mut clock = StepClock::new(0.0, start);
        assert_eq!(clock.bpm(), 40.0);
        clock.set_bpm(10_000.0);
        assert_eq!(clock.bpm(), 240.0);
        clock.set_bpm(93.5);
        assert_eq!(clock.bpm(), 93.5);
    }
}
