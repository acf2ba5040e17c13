//! Output shift-register driver for the step LED column.
//!
//! An addressable bit array backed by a serial-in/parallel-out register
//! chain. Writes only touch the in-memory buffer; nothing reaches the
//! hardware until [`ShiftRegister::flush`] clocks the whole buffer out and
//! strobes it into the output latches.

use std::thread;
use std::time::Duration;

use crate::hal::OutputLine;

/// Safe default for the strobe high time.
const DEFAULT_STROBE_HOLD: Duration = Duration::from_micros(10);

pub struct ShiftRegister {
    buffer: Vec<u8>,
    clock: Box<dyn OutputLine>,
    data: Box<dyn OutputLine>,
    strobe: Box<dyn OutputLine>,
    strobe_hold: Duration,
}

impl ShiftRegister {
    /// A driver for a chain of `bytes` registers (8 output lines each).
    pub fn new(
        clock: impl OutputLine + 'static,
        data: impl OutputLine + 'static,
        strobe: impl OutputLine + 'static,
        bytes: usize,
    ) -> Self {
        Self {
            buffer: vec![0; bytes],
            clock: Box::new(clock),
            data: Box::new(data),
            strobe: Box::new(strobe),
            strobe_hold: DEFAULT_STROBE_HOLD,
        }
    }

    /// Map a bit index to its byte position and mask within the buffer.
    pub fn index_mask(i: usize) -> (usize, u8) {
        (i / 8, 1 << (i % 8))
    }

    /// Addressable bits in the chain.
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8
    }

    /// Minimum strobe high time; a constant of the register family.
    pub fn set_strobe_hold(&mut self, hold: Duration) {
        self.strobe_hold = hold;
    }

    /// Set or clear one bit. Indices beyond the chain are ignored: the
    /// chain length is a wiring constant, not a runtime error.
    pub fn set_bit(&mut self, i: usize, value: bool) {
        let (index, mask) = Self::index_mask(i);
        if let Some(byte) = self.buffer.get_mut(index) {
            if value {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Read one bit back from the buffer; false beyond the chain.
    pub fn get_bit(&self, i: usize) -> bool {
        let (index, mask) = Self::index_mask(i);
        match self.buffer.get(index) {
            Some(byte) => byte & mask != 0,
            None => false,
        }
    }

    /// Shift the whole buffer out and latch it onto the output lines.
    ///
    /// Bits go out in ascending index order, one clock pulse each; the
    /// wiring maps bit i to LED i under this order.
    pub fn flush(&mut self) {
        for i in 0..self.bit_len() {
            let bit = self.get_bit(i);
            self.data.set(bit);
            self.clock.set(true);
            self.clock.set(false);
        }
        self.strobe();
    }

    /// Commit the shifted-in bits to the output latches.
    fn strobe(&mut self) {
        self.strobe.set(true);
        thread::sleep(self.strobe_hold);
        self.strobe.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LedChain;

    fn register(chain: &LedChain, bytes: usize) -> ShiftRegister {
        let mut reg = ShiftRegister::new(
            chain.clock_line(),
            chain.data_line(),
            chain.strobe_line(),
            bytes,
        );
        reg.set_strobe_hold(Duration::ZERO);
        reg
    }

    #[test]
    fn test_index_mask() {
        assert_eq!(ShiftRegister::index_mask(0), (0, 0x01));
        assert_eq!(ShiftRegister::index_mask(3), (0, 0x08));
        assert_eq!(ShiftRegister::index_mask(7), (0, 0x80));
        assert_eq!(ShiftRegister::index_mask(8), (1, 0x01));
        assert_eq!(ShiftRegister::index_mask(12), (1, 0x10));
        assert_eq!(ShiftRegister::index_mask(15), (1, 0x80));
        // one bit per index over the whole chain, recoverable from the
        // byte/mask pair
        for i in 0..16 {
            let (byte, mask) = ShiftRegister::index_mask(i);
            assert_eq!(mask.count_ones(), 1);
            assert_eq!(byte * 8 + mask.trailing_zeros() as usize, i);
        }
    }

    #[test]
    fn test_bit_roundtrip() {
        let chain = LedChain::new(2);
        let mut reg = register(&chain, 2);
        for i in 0..reg.bit_len() {
            reg.set_bit(i, true);
            assert!(reg.get_bit(i));
            reg.set_bit(i, false);
            assert!(!reg.get_bit(i));
        }
    }

    #[test]
    fn test_neighbours_untouched() {
        let chain = LedChain::new(2);
        let mut reg = register(&chain, 2);
        reg.set_bit(3, true);
        assert!(!reg.get_bit(2));
        assert!(!reg.get_bit(4));
    }

    #[test]
    fn test_out_of_range_is_silent() {
        let chain = LedChain::new(2);
        let mut reg = register(&chain, 2);
        reg.set_bit(16, true);
        reg.set_bit(999, true);
        assert!(!reg.get_bit(16));
        assert!(!reg.get_bit(999));
        for i in 0..reg.bit_len() {
            assert!(!reg.get_bit(i));
        }
    }

    #[test]
    fn test_writes_invisible_until_flush() {
        let chain = LedChain::new(2);
        let mut reg = register(&chain, 2);
        reg.set_bit(0, true);
        assert_eq!(chain.latched(), vec![false; 16]);
        reg.flush();
        assert!(chain.led(0));
    }

    #[test]
    fn test_flush_drives_chain() {
        let chain = LedChain::new(2);
        let mut reg = register(&chain, 2);
        reg.set_bit(0, true);
        reg.set_bit(9, true);
        reg.set_bit(15, true);
        reg.flush();
        for i in 0..16 {
            assert_eq!(chain.led(i), i == 0 || i == 9 || i == 15, "led {i}");
        }
    }

    #[test]
    fn test_flush_is_idempotent() {
        let chain = LedChain::new(2);
        let mut reg = register(&chain, 2);
        reg.set_bit(5, true);
        reg.flush();
        let first = chain.latched();
        reg.flush();
        assert_eq!(chain.latched(), first);
    }
}
