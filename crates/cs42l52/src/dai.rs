//! Digital audio interface (DAI) format
//!
//! The serial port format is described by three independent choices: who
//! drives the bit and frame clocks, how samples are framed, and whether the
//! clocks are inverted. [`DaiFormat::iface_bits`] folds them into the
//! IFACE_CTL1 register byte.
//!
//! | Framing         | ADC field | DAC field | DSP bit |
//! |-----------------|-----------|-----------|---------|
//! | I2S             | I2S       | I2S       | 0       |
//! | Left-justified  | LJ        | LJ        | 0       |
//! | Right-justified | LJ        | RJ        | 0       |
//! | DSP mode A      | LJ        | LJ        | 1       |
//!
//! The ADC output has no right-justified mode, so it stays left-justified
//! when the DAC input is right-justified.

use crate::error::{Error, Result};
use crate::registers::{
    IFACE_CTL1_ADC_FMT_I2S, IFACE_CTL1_ADC_FMT_LEFT_J, IFACE_CTL1_DAC_FMT_I2S,
    IFACE_CTL1_DAC_FMT_LEFT_J, IFACE_CTL1_DAC_FMT_RIGHT_J, IFACE_CTL1_DSP_MODE_EN,
    IFACE_CTL1_INV_SCLK, IFACE_CTL1_MASTER,
};

/// Which side drives the bit clock (SCLK) and frame clock (LRCK).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRole {
    /// Codec drives both clocks.
    CodecMaster,
    /// Host drives both clocks.
    #[default]
    CodecSlave,
    /// Codec drives SCLK, host drives LRCK. Not supported by the chip.
    CodecBitMasterFrameSlave,
    /// Host drives SCLK, codec drives LRCK. Not supported by the chip.
    CodecBitSlaveFrameMaster,
}

/// Sample framing on the serial data lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    /// Philips I2S: data delayed one SCLK after the LRCK edge.
    #[default]
    I2s,
    /// Left-justified: MSB aligned with the LRCK edge.
    LeftJustified,
    /// Right-justified: LSB aligned with the end of the frame half.
    RightJustified,
    /// DSP mode A: data one SCLK after a short frame pulse.
    DspA,
    /// DSP mode B: data on the frame pulse. Not supported by the chip.
    DspB,
}

/// Bit clock / frame clock polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockInversion {
    /// Normal SCLK, normal LRCK.
    #[default]
    NormalBitNormalFrame,
    /// Inverted SCLK, inverted LRCK.
    InvertedBitInvertedFrame,
    /// Inverted SCLK, normal LRCK.
    InvertedBitNormalFrame,
    /// Normal SCLK, inverted LRCK.
    NormalBitInvertedFrame,
}

impl ClockInversion {
    /// `true` when the bit clock polarity is inverted.
    pub fn bit_clock_inverted(self) -> bool {
        matches!(
            self,
            Self::InvertedBitInvertedFrame | Self::InvertedBitNormalFrame
        )
    }
}

/// Complete serial port format.
///
/// Default: I2S framing, codec slave, normal clock polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaiFormat {
    /// Clock ownership.
    pub role: ClockRole,
    /// Sample framing.
    pub framing: Framing,
    /// Clock polarity.
    pub inversion: ClockInversion,
}

impl DaiFormat {
    /// Build a format from its three parts.
    pub const fn new(role: ClockRole, framing: Framing, inversion: ClockInversion) -> Self {
        Self {
            role,
            framing,
            inversion,
        }
    }

    /// IFACE_CTL1 register value for this format.
    ///
    /// Mixed clock roles and DSP mode B have no register encoding and return
    /// [`Error::InvalidFormat`]. Frame clock inversion has no control bit and
    /// is ignored.
    pub fn iface_bits(&self) -> Result<u8> {
        let role = match self.role {
            ClockRole::CodecMaster => IFACE_CTL1_MASTER,
            ClockRole::CodecSlave => 0,
            ClockRole::CodecBitMasterFrameSlave | ClockRole::CodecBitSlaveFrameMaster => {
                return Err(Error::InvalidFormat)
            }
        };

        let framing = match self.framing {
            Framing::I2s => IFACE_CTL1_ADC_FMT_I2S | IFACE_CTL1_DAC_FMT_I2S,
            Framing::LeftJustified => IFACE_CTL1_ADC_FMT_LEFT_J | IFACE_CTL1_DAC_FMT_LEFT_J,
            Framing::RightJustified => IFACE_CTL1_ADC_FMT_LEFT_J | IFACE_CTL1_DAC_FMT_RIGHT_J,
            Framing::DspA => IFACE_CTL1_DSP_MODE_EN,
            Framing::DspB => return Err(Error::InvalidFormat),
        };

        let inversion = if self.inversion.bit_clock_inverted() {
            IFACE_CTL1_INV_SCLK
        } else {
            0
        };

        Ok(role | framing | inversion)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_i2s_slave() {
        assert_eq!(DaiFormat::default().iface_bits().unwrap(), 0x24);
    }

    #[test]
    fn master_sets_top_bit() {
        let fmt = DaiFormat::new(
            ClockRole::CodecMaster,
            Framing::I2s,
            ClockInversion::NormalBitNormalFrame,
        );
        assert_eq!(fmt.iface_bits().unwrap(), 0x80 | 0x24);
    }

    #[test]
    fn right_justified_only_touches_dac_field() {
        let fmt = DaiFormat {
            framing: Framing::RightJustified,
            ..DaiFormat::default()
        };
        assert_eq!(fmt.iface_bits().unwrap(), 0x08);
    }

    #[test]
    fn left_justified_is_all_zero() {
        let fmt = DaiFormat {
            framing: Framing::LeftJustified,
            ..DaiFormat::default()
        };
        assert_eq!(fmt.iface_bits().unwrap(), 0x00);
    }

    #[test]
    fn dsp_a_sets_dsp_bit() {
        let fmt = DaiFormat {
            framing: Framing::DspA,
            ..DaiFormat::default()
        };
        assert_eq!(fmt.iface_bits().unwrap(), 0x10);
    }

    #[test]
    fn inverted_bit_clock_sets_inv_sclk() {
        for inversion in [
            ClockInversion::InvertedBitInvertedFrame,
            ClockInversion::InvertedBitNormalFrame,
        ] {
            let fmt = DaiFormat {
                inversion,
                ..DaiFormat::default()
            };
            assert_eq!(fmt.iface_bits().unwrap() & 0x40, 0x40);
        }
    }

    #[test]
    fn frame_inversion_alone_is_ignored() {
        let fmt = DaiFormat {
            inversion: ClockInversion::NormalBitInvertedFrame,
            ..DaiFormat::default()
        };
        assert_eq!(fmt.iface_bits().unwrap(), 0x24);
    }

    #[test]
    fn unsupported_combinations_are_rejected() {
        let dsp_b = DaiFormat {
            framing: Framing::DspB,
            ..DaiFormat::default()
        };
        assert_eq!(dsp_b.iface_bits(), Err(Error::InvalidFormat));

        for role in [
            ClockRole::CodecBitMasterFrameSlave,
            ClockRole::CodecBitSlaveFrameMaster,
        ] {
            let fmt = DaiFormat {
                role,
                ..DaiFormat::default()
            };
            assert_eq!(fmt.iface_bits(), Err(Error::InvalidFormat));
        }
    }
}
