//! Bus transport between the register cache and the chip
//!
//! The cache only needs two primitives: push a short byte sequence and read
//! a contiguous block of registers. Both report how many bytes actually
//! moved; the cache turns short counts into
//! [`Error::TransportWrite`](crate::Error::TransportWrite) /
//! [`Error::TransportRead`](crate::Error::TransportRead).

use crate::registers::MAP_AUTO_INCREMENT;

/// Byte transport to the codec's control port.
pub trait Transport {
    /// Bus error type
    type Error: core::fmt::Debug;

    /// Write `data` (register address followed by payload).
    ///
    /// Returns the number of bytes the bus accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read `buffer.len()` consecutive registers starting at `start`.
    ///
    /// Returns the number of bytes filled.
    fn read_block(&mut self, start: u8, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(data)
    }

    fn read_block(&mut self, start: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_block(start, buffer)
    }
}

/// [`Transport`] over a blocking embedded-hal I²C bus.
///
/// Block reads set the MAP auto-increment bit on the start address so the
/// chip advances its register pointer after every byte.
pub struct I2cTransport<I> {
    i2c: I,
    address: u8,
}

impl<I: embedded_hal::i2c::I2c> I2cTransport<I> {
    /// Wrap `i2c`, talking to the codec at 7-bit `address`.
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address in use.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: embedded_hal::i2c::I2c> Transport for I2cTransport<I> {
    type Error = I::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.i2c.write(self.address, data)?;
        Ok(data.len())
    }

    fn read_block(&mut self, start: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c
            .write_read(self.address, &[start | MAP_AUTO_INCREMENT], buffer)?;
        Ok(buffer.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingI2c {
        writes: std::vec::Vec<(u8, std::vec::Vec<u8>)>,
        reply: std::vec::Vec<u8>,
    }
    impl embedded_hal::i2c::ErrorType for RecordingI2c {
        type Error = core::convert::Infallible;
    }
    impl embedded_hal::i2c::I2c for RecordingI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [embedded_hal::i2c::Operation<'_>],
        ) -> Result<(), Self::Error> {
            for op in operations.iter_mut() {
                match op {
                    embedded_hal::i2c::Operation::Write(data) => {
                        self.writes.push((address, data.to_vec()));
                    }
                    embedded_hal::i2c::Operation::Read(buf) => {
                        for (dst, src) in buf.iter_mut().zip(self.reply.iter()) {
                            *dst = *src;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn write_reports_full_length() {
        let mut t = I2cTransport::new(RecordingI2c::default(), 0x4A);
        assert_eq!(t.write(&[0x20, 0x34]).unwrap(), 2);
        let bus = t.release();
        assert_eq!(bus.writes, std::vec![(0x4A, std::vec![0x20, 0x34])]);
    }

    #[test]
    fn block_read_sets_auto_increment() {
        let bus = RecordingI2c {
            reply: std::vec![0xAA, 0xBB, 0xCC],
            ..RecordingI2c::default()
        };
        let mut t = I2cTransport::new(bus, 0x4A);
        let mut buf = [0u8; 3];
        assert_eq!(t.read_block(0x20, &mut buf).unwrap(), 3);
        assert_eq!(buf, [0xAA, 0xBB, 0xCC]);
        let bus = t.release();
        assert_eq!(bus.writes, std::vec![(0x4A, std::vec![0xA0])]);
    }

    #[test]
    fn address_is_kept() {
        let t = I2cTransport::new(RecordingI2c::default(), 0x4B);
        assert_eq!(t.address(), 0x4B);
    }
}
