//! Clock divider selection
//!
//! The CS42L52 derives its internal clocks from MCLK through a small set of
//! dividers programmed in CLK_CTL (0x05). Which combination is valid depends
//! on both the MCLK frequency and the sample rate, so the chip publishes a
//! table of supported pairs (DS680 §4.7, Table 6). [`resolve`] picks the
//! entry for a requested rate whose MCLK is closest to the actual reference
//! clock.
//!
//! # CLK_CTL layout
//!
//! ```text
//!  7      6:5     4        3        2:1     0
//! AUTO  SPEED  32k_GRP  27M_MCLK  RATIO  MCLKDIV2
//! ```
//!
//! `AUTO` is never set by [`ClockTableEntry::register_value`]; it belongs to
//! [`ClockMode::Auto`](crate::ClockMode::Auto).

use crate::error::{Error, Result};
use crate::registers::{
    CLK_CTL_27M_MCLK_SHIFT, CLK_CTL_32K_SR_SHIFT, CLK_CTL_MCLKDIV2_SHIFT, CLK_CTL_RATIO_SHIFT,
    CLK_CTL_SPEED_SHIFT,
};

/// CLK_CTL SPEED field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SpeedMode {
    /// 50–100 kHz.
    Double = 0,
    /// 4–50 kHz.
    Single = 1,
    /// 12.5–25 kHz.
    Half = 2,
    /// 4–12.5 kHz.
    Quarter = 3,
}

/// CLK_CTL RATIO field: MCLK / LRCK ratio family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Ratio {
    /// 128 × (speed multiple); 11.2896 / 12.288 / 18.432 MHz MCLK.
    R128 = 0,
    /// 125 × (speed multiple); 12 / 24 / 27 MHz MCLK.
    R125 = 1,
    /// 132 × (speed multiple).
    R132 = 2,
    /// 136 × (speed multiple).
    R136 = 3,
}

/// One supported (MCLK, sample rate) pair and its divider settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTableEntry {
    /// Reference clock on MCLK, in Hz.
    pub mclk_hz: u32,
    /// Sample rate, in Hz.
    pub rate_hz: u32,
    /// Speed mode.
    pub speed: SpeedMode,
    /// Rate belongs to the 8/16/32 kHz group.
    pub group_32k: bool,
    /// MCLK is a 27 MHz video clock.
    pub mclk_27mhz: bool,
    /// MCLK / LRCK ratio family.
    pub ratio: Ratio,
    /// Divide MCLK by two before use.
    pub mclk_div2: bool,
}

impl ClockTableEntry {
    const fn new(
        mclk_hz: u32,
        rate_hz: u32,
        speed: SpeedMode,
        group_32k: bool,
        mclk_27mhz: bool,
        ratio: Ratio,
        mclk_div2: bool,
    ) -> Self {
        Self {
            mclk_hz,
            rate_hz,
            speed,
            group_32k,
            mclk_27mhz,
            ratio,
            mclk_div2,
        }
    }

    /// CLK_CTL value for this entry.
    pub fn register_value(&self) -> u8 {
        ((self.speed as u8) << CLK_CTL_SPEED_SHIFT)
            | (u8::from(self.group_32k) << CLK_CTL_32K_SR_SHIFT)
            | (u8::from(self.mclk_27mhz) << CLK_CTL_27M_MCLK_SHIFT)
            | ((self.ratio as u8) << CLK_CTL_RATIO_SHIFT)
            | (u8::from(self.mclk_div2) << CLK_CTL_MCLKDIV2_SHIFT)
    }
}

use Ratio::{R125, R128};
use SpeedMode::{Double as DS, Half as HS, Quarter as QS, Single as SS};

/// Every (MCLK, rate) pair the chip supports, grouped by rate.
///
/// Order matters: when two MCLK values are equally close to the reference
/// clock, [`resolve`] keeps the one listed first.
#[rustfmt::skip]
pub static CLOCK_TABLE: [ClockTableEntry; 32] = [
    // 8 kHz
    ClockTableEntry::new(12_288_000,  8_000, QS, true,  false, R128, false),
    ClockTableEntry::new(18_432_000,  8_000, QS, true,  false, R128, false),
    ClockTableEntry::new(12_000_000,  8_000, QS, true,  false, R125, false),
    ClockTableEntry::new(24_000_000,  8_000, QS, true,  false, R125, true),
    ClockTableEntry::new(27_000_000,  8_000, QS, true,  true,  R125, false),
    // 11.025 kHz
    ClockTableEntry::new(11_289_600, 11_025, QS, false, false, R128, false),
    ClockTableEntry::new(16_934_400, 11_025, QS, false, false, R128, false),
    // 16 kHz
    ClockTableEntry::new(12_288_000, 16_000, HS, true,  false, R128, false),
    ClockTableEntry::new(18_432_000, 16_000, HS, true,  false, R128, false),
    ClockTableEntry::new(12_000_000, 16_000, HS, true,  false, R125, false),
    ClockTableEntry::new(24_000_000, 16_000, HS, true,  false, R125, true),
    ClockTableEntry::new(27_000_000, 16_000, HS, true,  true,  R125, true),
    // 22.05 kHz
    ClockTableEntry::new(11_289_600, 22_050, HS, false, false, R128, false),
    ClockTableEntry::new(16_934_400, 22_050, HS, false, false, R128, false),
    // 32 kHz
    ClockTableEntry::new(12_288_000, 32_000, SS, true,  false, R128, false),
    ClockTableEntry::new(18_432_000, 32_000, SS, true,  false, R128, false),
    ClockTableEntry::new(12_000_000, 32_000, SS, true,  false, R125, false),
    ClockTableEntry::new(24_000_000, 32_000, SS, true,  false, R125, true),
    ClockTableEntry::new(27_000_000, 32_000, SS, true,  true,  R125, false),
    // 44.1 kHz
    ClockTableEntry::new(11_289_600, 44_100, SS, false, false, R128, false),
    ClockTableEntry::new(16_934_400, 44_100, SS, false, false, R128, false),
    // 48 kHz
    ClockTableEntry::new(12_288_000, 48_000, SS, false, false, R128, false),
    ClockTableEntry::new(18_432_000, 48_000, SS, false, false, R128, false),
    ClockTableEntry::new(12_000_000, 48_000, SS, false, false, R125, false),
    ClockTableEntry::new(24_000_000, 48_000, SS, false, false, R125, true),
    ClockTableEntry::new(27_000_000, 48_000, SS, false, true,  R125, true),
    // 88.2 kHz
    ClockTableEntry::new(11_289_600, 88_200, DS, false, false, R128, false),
    ClockTableEntry::new(16_934_400, 88_200, DS, false, false, R128, false),
    // 96 kHz
    ClockTableEntry::new(12_288_000, 96_000, DS, false, false, R128, false),
    ClockTableEntry::new(18_432_000, 96_000, DS, false, false, R128, false),
    ClockTableEntry::new(12_000_000, 96_000, DS, false, false, R125, false),
    ClockTableEntry::new(24_000_000, 96_000, DS, false, false, R125, true),
];

/// Pick the table entry for `rate_hz` whose MCLK is closest to
/// `reference_clock_hz`.
///
/// Ties keep the earlier entry. Returns [`Error::UnsupportedRate`] when no
/// entry lists `rate_hz`.
pub fn resolve(reference_clock_hz: u32, rate_hz: u32) -> Result<&'static ClockTableEntry> {
    let mut best: Option<(&'static ClockTableEntry, u32)> = None;
    for entry in CLOCK_TABLE.iter().filter(|e| e.rate_hz == rate_hz) {
        let distance = reference_clock_hz.abs_diff(entry.mclk_hz);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entry, distance)),
        }
    }

    match best {
        Some((entry, _)) => {
            debug!(
                "clock: {} Hz @ {} Hz -> mclk {} Hz, CLK_CTL {:#x}",
                reference_clock_hz,
                rate_hz,
                entry.mclk_hz,
                entry.register_value()
            );
            Ok(entry)
        }
        None => {
            warn!("clock: no table entry for {} Hz", rate_hz);
            Err(Error::UnsupportedRate { rate: rate_hz })
        }
    }
}
