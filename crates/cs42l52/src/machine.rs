//! Board glue
//!
//! A board fixes how the codec is wired: its bus address, the reference
//! clock on MCLK and the serial port format agreed with the host's audio
//! port. [`BoardLink::hw_params`] replays that wiring on every stream start,
//! in the order the codec needs it: format, then clock, then the codec's own
//! hardware-params.
//!
//! # OMAP3 EVM
//!
//! | Signal | Source                 | Value             |
//! |--------|------------------------|-------------------|
//! | MCLK   | board oscillator       | 26 MHz            |
//! | SCLK   | McBSP1 (host master)   | host port divider |
//! | LRCK   | McBSP1 (host master)   | = sample rate     |
//! | I2C    | bus 2                  | 0x4A              |
//!
//! Only the codec side is programmed here. The McBSP bit-clock divider
//! belongs to the host's audio port driver.

use crate::clock::ClockTableEntry;
use crate::codec::Cs42l52;
use crate::config::{ClockMode, CodecConfig};
use crate::dai::{ClockInversion, ClockRole, DaiFormat, Framing};
use crate::error::Result;
use crate::registers::CS42L52_I2C_ADDR_AD0_LOW;
use crate::transport::Transport;

/// Fixed board wiring of one codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardLink {
    /// 7-bit I2C address of the codec.
    pub i2c_address: u8,
    /// Reference clock fed to MCLK, in Hz.
    pub reference_clock_hz: u32,
    /// Serial port format used on this board.
    pub format: DaiFormat,
}

impl BoardLink {
    /// OMAP3 EVM with a CDB42L52 daughter card: 26 MHz MCLK, McBSP master,
    /// codec slave, I2S.
    pub const fn omap3_evm() -> Self {
        Self {
            i2c_address: CS42L52_I2C_ADDR_AD0_LOW,
            reference_clock_hz: 26_000_000,
            format: DaiFormat::new(
                ClockRole::CodecSlave,
                Framing::I2s,
                ClockInversion::NormalBitNormalFrame,
            ),
        }
    }

    /// Attach configuration matching this board.
    pub fn config(&self) -> CodecConfig {
        CodecConfig {
            i2c_address: self.i2c_address,
            sysclk_hz: self.reference_clock_hz,
            format: self.format,
            clock_mode: ClockMode::Manual,
        }
    }

    /// Configure `codec` for a stream at `rate_hz`.
    ///
    /// Sets the board format and reference clock, then runs the codec's
    /// hardware-params, which replaces the sysclk with the chosen table MCLK.
    pub fn hw_params<T: Transport>(
        &self,
        codec: &mut Cs42l52<T>,
        rate_hz: u32,
    ) -> Result<&'static ClockTableEntry> {
        codec.set_fmt(self.format)?;
        codec.set_sysclk(self.reference_clock_hz)?;
        codec.hw_params(rate_hz)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::registers::{REG_CLK_CTL, REG_IFACE_CTL1};

    #[test]
    fn omap3_evm_preset() {
        let board = BoardLink::omap3_evm();
        assert_eq!(board.i2c_address, 0x4A);
        assert_eq!(board.reference_clock_hz, 26_000_000);
        assert_eq!(board.format.iface_bits().unwrap(), 0x24);
    }

    #[test]
    fn stream_start_resolves_from_board_clock() {
        let board = BoardLink::omap3_evm();
        let mut codec = Cs42l52::attach(MockTransport::new(), board.config()).unwrap();

        let entry = board.hw_params(&mut codec, 48_000).unwrap();
        assert_eq!(entry.mclk_hz, 27_000_000);
        assert_eq!(codec.cache().read(REG_CLK_CTL).unwrap(), 0x2B);
        assert_eq!(codec.cache().read(REG_IFACE_CTL1).unwrap(), 0x24);

        // Second stream starts from 26 MHz again, not the adopted 27 MHz.
        let entry = board.hw_params(&mut codec, 96_000).unwrap();
        assert_eq!(entry.mclk_hz, 24_000_000);
    }
}
