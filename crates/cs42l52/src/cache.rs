//! Register cache
//!
//! Host-side mirror of every CS42L52 control register. Reads are served from
//! the cache without touching the bus; writes update the cache first and then
//! go straight through to the chip.
//!
//! # Write ordering
//!
//! The cache is updated before the bus write is attempted and is not rolled
//! back if the bus write fails. After a reported
//! [`Error::TransportWrite`] the cache holds the requested value while the
//! chip may still hold the old one; [`RegisterCache::bulk_sync`] re-reads the
//! chip and restores agreement.

use crate::error::{Error, Result};
use crate::registers::{DEFAULTS, REGISTER_COUNT, REG_CHARGE_PUMP, SMBUS_BLOCK_MAX};
use crate::transport::Transport;

/// Shadow copy of the chip's register map plus the transport it mirrors.
pub struct RegisterCache<T> {
    transport: T,
    values: [u8; REGISTER_COUNT],
}

impl<T: Transport> RegisterCache<T> {
    /// Create a cache seeded with the datasheet power-on defaults.
    ///
    /// No bus traffic happens until the first write or [`Self::bulk_sync`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            values: DEFAULTS,
        }
    }

    /// Cached value of `reg`.
    pub fn read(&self, reg: u8) -> Result<u8> {
        self.values
            .get(usize::from(reg))
            .copied()
            .ok_or(Error::OutOfRange { reg })
    }

    /// Store `value` in the cache, then push it to the chip.
    ///
    /// The cached value is kept even when the bus write comes up short.
    pub fn write(&mut self, reg: u8, value: u8) -> Result<()> {
        let slot = self
            .values
            .get_mut(usize::from(reg))
            .ok_or(Error::OutOfRange { reg })?;
        *slot = value;

        trace!("write reg {:#x} = {:#x}", reg, value);
        let written = self.transport.write(&[reg, value]).unwrap_or(0);
        if written == 2 {
            Ok(())
        } else {
            error!("write to reg {:#x} failed ({} of 2 bytes)", reg, written);
            Err(Error::TransportWrite { reg, written })
        }
    }

    /// Read-modify-write: replace the `mask` bits of `reg` with `value & mask`.
    pub fn update_bits(&mut self, reg: u8, mask: u8, value: u8) -> Result<()> {
        let old = self.read(reg)?;
        let new = (old & !mask) | (value & mask);
        self.write(reg, new)
    }

    /// Re-read the whole register map from the chip.
    ///
    /// The map is fetched in SMBus-sized blocks (two for the CS42L52). The
    /// cache is only replaced once every byte has arrived.
    pub fn bulk_sync(&mut self) -> Result<()> {
        let mut fresh = [0u8; REGISTER_COUNT];
        let mut got = 0usize;
        for (index, block) in fresh.chunks_mut(SMBUS_BLOCK_MAX).enumerate() {
            // REGISTER_COUNT < 256, so block starts always fit in a u8.
            let start = u8::try_from(index.saturating_mul(SMBUS_BLOCK_MAX)).unwrap_or(u8::MAX);
            let len = block.len();
            let n = self.transport.read_block(start, block).unwrap_or(0);
            got = got.saturating_add(n);
            if n != len {
                break;
            }
        }

        if got != REGISTER_COUNT {
            error!("register sync read {} of {} bytes", got, REGISTER_COUNT);
            return Err(Error::TransportRead {
                expected: REGISTER_COUNT,
                got,
            });
        }

        self.values = fresh;
        debug!("register cache synchronised ({} registers)", REGISTER_COUNT);
        Ok(())
    }

    /// Push every cached register from `first` to the end of the map back to
    /// the chip, stopping at the first failure.
    pub fn flush_from(&mut self, first: u8) -> Result<()> {
        for reg in first..=REG_CHARGE_PUMP {
            let value = self.read(reg)?;
            self.write(reg, value)?;
        }
        Ok(())
    }

    /// Whole cached map, indexed by register address.
    pub fn snapshot(&self) -> &[u8; REGISTER_COUNT] {
        &self.values
    }

    /// Direct transport access for writes that bypass the cache.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Shared transport access.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Drop the cache and give the transport back.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::registers::{REG_MASTERA_VOL, REG_PWRCTL1};

    #[test]
    fn new_cache_holds_defaults() {
        let cache = RegisterCache::new(MockTransport::new());
        assert_eq!(cache.snapshot(), &DEFAULTS);
        assert_eq!(cache.transport().transaction_count(), 0);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut cache = RegisterCache::new(MockTransport::new());
        cache.write(REG_MASTERA_VOL, 0x7B).unwrap();
        assert_eq!(cache.read(REG_MASTERA_VOL).unwrap(), 0x7B);
        assert_eq!(cache.transport().writes, std::vec![std::vec![0x20, 0x7B]]);
    }

    #[test]
    fn read_is_served_from_cache() {
        let cache = RegisterCache::new(MockTransport::new());
        let _ = cache.read(REG_PWRCTL1).unwrap();
        assert_eq!(cache.transport().transaction_count(), 0);
    }

    #[test]
    fn out_of_range_never_touches_transport() {
        let mut cache = RegisterCache::new(MockTransport::new());
        assert_eq!(cache.read(53), Err(Error::OutOfRange { reg: 53 }));
        assert_eq!(cache.write(0xFF, 1), Err(Error::OutOfRange { reg: 0xFF }));
        assert_eq!(
            cache.update_bits(0x40, 0x0F, 0x01),
            Err(Error::OutOfRange { reg: 0x40 })
        );
        assert_eq!(cache.transport().transaction_count(), 0);
    }

    #[test]
    fn failed_write_keeps_new_cached_value() {
        let mut t = MockTransport::new();
        t.short_write = Some(1);
        let mut cache = RegisterCache::new(t);
        assert_eq!(
            cache.write(REG_MASTERA_VOL, 0x99),
            Err(Error::TransportWrite {
                reg: REG_MASTERA_VOL,
                written: 1
            })
        );
        assert_eq!(cache.read(REG_MASTERA_VOL).unwrap(), 0x99);
        // Chip still holds the old value until the next sync.
        assert_eq!(cache.transport().registers[0x20], DEFAULTS[0x20]);
    }

    #[test]
    fn update_bits_preserves_unmasked_bits() {
        let mut cache = RegisterCache::new(MockTransport::new());
        cache.write(REG_PWRCTL1, 0b1010_0101).unwrap();
        cache.update_bits(REG_PWRCTL1, 0x0F, 0x03).unwrap();
        assert_eq!(cache.read(REG_PWRCTL1).unwrap(), 0b1010_0011);
    }

    #[test]
    fn update_bits_ignores_value_bits_outside_mask() {
        let mut cache = RegisterCache::new(MockTransport::new());
        cache.write(REG_PWRCTL1, 0x00).unwrap();
        cache.update_bits(REG_PWRCTL1, 0x0F, 0xFF).unwrap();
        assert_eq!(cache.read(REG_PWRCTL1).unwrap(), 0x0F);
    }

    #[test]
    fn bulk_sync_overwrites_everything_in_two_blocks() {
        let mut cache = RegisterCache::new(MockTransport::filled(0x5A));
        cache.write(REG_MASTERA_VOL, 0x01).unwrap();
        // Chip loses the write behind the cache's back.
        cache.transport_mut().registers[usize::from(REG_MASTERA_VOL)] = 0x5A;
        assert_eq!(cache.read(REG_MASTERA_VOL).unwrap(), 0x01);

        cache.bulk_sync().unwrap();
        assert!(cache.snapshot().iter().all(|&v| v == 0x5A));
        assert_eq!(cache.transport().reads, std::vec![(0x00, 32), (0x20, 21)]);
    }

    #[test]
    fn short_bulk_read_fails_and_keeps_cache() {
        let mut t = MockTransport::filled(0x5A);
        t.short_read = Some(10);
        let mut cache = RegisterCache::new(t);
        assert_eq!(
            cache.bulk_sync(),
            Err(Error::TransportRead {
                expected: REGISTER_COUNT,
                got: 10
            })
        );
        assert_eq!(cache.snapshot(), &DEFAULTS);
    }

    #[test]
    fn flush_from_rewrites_tail_of_map() {
        let mut cache = RegisterCache::new(MockTransport::new());
        cache.flush_from(REG_PWRCTL1).unwrap();
        let writes = &cache.transport().writes;
        assert_eq!(writes.len(), REGISTER_COUNT - 2);
        assert_eq!(writes[0], std::vec![0x02, DEFAULTS[2]]);
        assert_eq!(writes[writes.len() - 1], std::vec![0x34, DEFAULTS[0x34]]);
    }
}
