//! Mock transport for host-side testing
//!
//! Models the chip as a flat 128-byte register file so raw setup writes
//! above the cached range land somewhere observable. Records every write for
//! assertions and can be told to short-change writes or reads.

#![cfg(any(test, feature = "std"))]

extern crate std;

use std::vec::Vec;

use crate::registers::{DEFAULTS, MAP_AUTO_INCREMENT};
use crate::transport::Transport;

/// Size of the modelled register file.
pub const MOCK_REGISTER_SPACE: usize = 128;

/// Mock transport: records all traffic for test assertions.
pub struct MockTransport {
    /// Chip-side register contents.
    pub registers: [u8; MOCK_REGISTER_SPACE],
    /// Every write payload, in order.
    pub writes: Vec<Vec<u8>>,
    /// Every block read as `(start, len)`, auto-increment bit stripped.
    pub reads: Vec<(u8, usize)>,
    /// When set, writes report this many bytes instead of the full length.
    pub short_write: Option<usize>,
    /// When set, block reads report this many bytes instead of the full length.
    pub short_read: Option<usize>,
}

impl MockTransport {
    /// Create a mock chip holding the datasheet power-on defaults.
    pub fn new() -> Self {
        let mut registers = [0u8; MOCK_REGISTER_SPACE];
        for (dst, src) in registers.iter_mut().zip(DEFAULTS.iter()) {
            *dst = *src;
        }
        Self {
            registers,
            writes: Vec::new(),
            reads: Vec::new(),
            short_write: None,
            short_read: None,
        }
    }

    /// Create a mock chip whose registers hold `fill` everywhere.
    pub fn filled(fill: u8) -> Self {
        Self {
            registers: [fill; MOCK_REGISTER_SPACE],
            ..Self::new()
        }
    }

    /// Total number of bus transactions seen.
    pub fn transaction_count(&self) -> usize {
        self.writes.len().saturating_add(self.reads.len())
    }

    /// Last value written to `reg`, if any.
    pub fn last_write_to(&self, reg: u8) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.first() == Some(&reg))
            .and_then(|w| w.get(1).copied())
    }

    /// Forget recorded traffic, keeping register contents.
    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    type Error = core::convert::Infallible;

    #[allow(clippy::indexing_slicing)]
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.writes.push(data.to_vec());
        let accepted = self.short_write.unwrap_or(data.len()).min(data.len());
        if accepted >= 2 {
            let start = usize::from(data[0] & !MAP_AUTO_INCREMENT);
            for (offset, value) in data[1..accepted].iter().enumerate() {
                if let Some(slot) = self.registers.get_mut(start.saturating_add(offset)) {
                    *slot = *value;
                }
            }
        }
        Ok(accepted)
    }

    fn read_block(&mut self, start: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let start = start & !MAP_AUTO_INCREMENT;
        self.reads.push((start, buffer.len()));
        let filled = self.short_read.unwrap_or(buffer.len()).min(buffer.len());
        let base = usize::from(start);
        for (offset, dst) in buffer.iter_mut().take(filled).enumerate() {
            *dst = self.registers.get(base.saturating_add(offset)).copied().unwrap_or(0);
        }
        Ok(filled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn write_updates_register_file() {
        let mut t = MockTransport::new();
        assert_eq!(t.write(&[0x20, 0x55]).unwrap(), 2);
        assert_eq!(t.registers[0x20], 0x55);
        assert_eq!(t.last_write_to(0x20), Some(0x55));
    }

    #[test]
    fn short_write_is_reported_and_not_applied() {
        let mut t = MockTransport::new();
        t.short_write = Some(1);
        assert_eq!(t.write(&[0x20, 0x55]).unwrap(), 1);
        assert_eq!(t.registers[0x20], DEFAULTS[0x20]);
    }

    #[test]
    fn read_block_strips_auto_increment() {
        let mut t = MockTransport::filled(0x11);
        let mut buf = [0u8; 4];
        assert_eq!(t.read_block(0x80 | 0x04, &mut buf).unwrap(), 4);
        assert_eq!(buf, [0x11; 4]);
        assert_eq!(t.reads, std::vec![(0x04, 4)]);
    }
}
