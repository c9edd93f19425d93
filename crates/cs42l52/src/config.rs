//! Codec bring-up configuration
//!
//! Values the driver needs before the first register write: where the chip
//! sits on the bus, what reference clock feeds it, how its serial port is
//! wired and whether the divider is programmed explicitly.
//!
//! Board-specific presets live in [`crate::machine`].

use crate::dai::DaiFormat;
use crate::registers::{CLK_CTL_AUTO, CLK_CTL_SPEED_SHIFT, CS42L52_I2C_ADDR_AD0_LOW};

/// Lowest reference clock the chip accepts on MCLK, in Hz.
pub const SYSCLK_MIN_HZ: u32 = 11_000_000;
/// Highest reference clock the chip accepts on MCLK, in Hz.
pub const SYSCLK_MAX_HZ: u32 = 27_000_000;

/// How CLK_CTL is programmed at hardware-params time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    /// Write the divider resolved from the clock table.
    #[default]
    Manual,
    /// Let the chip detect speed mode and ratio itself.
    Auto,
}

impl ClockMode {
    /// CLK_CTL value written in [`ClockMode::Auto`]: auto-detect with the
    /// single-speed field set, the chip's power-on pattern.
    pub const AUTO_REGISTER_VALUE: u8 = CLK_CTL_AUTO | (1 << CLK_CTL_SPEED_SHIFT);
}

/// Static configuration handed to [`Cs42l52::attach`](crate::Cs42l52::attach).
///
/// Default: AD0 low (0x4A), 12.288 MHz MCLK, I2S codec-slave, manual
/// clocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodecConfig {
    /// 7-bit I2C address.
    pub i2c_address: u8,
    /// Initial reference clock on MCLK, in Hz.
    pub sysclk_hz: u32,
    /// Initial serial port format.
    pub format: DaiFormat,
    /// Clock divider programming mode.
    pub clock_mode: ClockMode,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            i2c_address: CS42L52_I2C_ADDR_AD0_LOW,
            sysclk_hz: 12_288_000,
            format: DaiFormat::default(),
            clock_mode: ClockMode::Manual,
        }
    }
}

impl CodecConfig {
    /// `true` when `hz` lies inside the MCLK input range.
    pub fn sysclk_in_range(hz: u32) -> bool {
        (SYSCLK_MIN_HZ..=SYSCLK_MAX_HZ).contains(&hz)
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn auto_pattern_matches_power_on_clock_default() {
        assert_eq!(ClockMode::AUTO_REGISTER_VALUE, 0xA0);
        assert_eq!(
            crate::registers::DEFAULTS[usize::from(crate::registers::REG_CLK_CTL)],
            0xA0
        );
    }

    #[test]
    fn default_config_uses_ad0_low_and_manual_clocking() {
        let config = CodecConfig::default();
        assert_eq!(config.i2c_address, 0x4A);
        assert_eq!(config.clock_mode, ClockMode::Manual);
        assert!(CodecConfig::sysclk_in_range(config.sysclk_hz));
    }

    #[test]
    fn sysclk_range_is_inclusive() {
        assert!(CodecConfig::sysclk_in_range(11_000_000));
        assert!(CodecConfig::sysclk_in_range(27_000_000));
        assert!(!CodecConfig::sysclk_in_range(10_999_999));
        assert!(!CodecConfig::sysclk_in_range(27_000_001));
    }
}
