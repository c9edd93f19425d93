//! CS42L52 register map
//!
//! Reference: Cirrus Logic CS42L52 datasheet DS680, §6 (Register Quick
//! Reference) and §7 (Register Descriptions).
//!
//! # Key I²C Constraints
//!
//! ## Auto-increment
//! Bit 7 of the memory address pointer (MAP) enables auto-increment for
//! multi-byte transfers. Block reads set it on the start address; single
//! register writes leave it clear.
//!
//! ## SMBus block size
//! Controllers limited to SMBus block transfers move at most 32 bytes per
//! read, so the 53-register map is fetched in two blocks split at 0x20.
//!
//! ## Required setup
//! DS680 §4.11 requires a fixed write sequence to undocumented registers
//! 0x00, 0x3E, 0x47 and 0x32 after power-up. These sit outside the cache
//! and are written directly through the transport.

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Reserved / test-mode key register (used by the required setup sequence).
pub const REG_TEST_KEY: u8 = 0x00;
/// Chip ID and revision (read-only).
pub const REG_CHIP: u8 = 0x01;
/// Power control 1: charge pump, PGA, ADC, codec power-down.
pub const REG_PWRCTL1: u8 = 0x02;
/// Power control 2: mic channels, mic bias power-down.
pub const REG_PWRCTL2: u8 = 0x03;
/// Power control 3: headphone / speaker channel power.
pub const REG_PWRCTL3: u8 = 0x04;
/// Clocking control: speed mode, 32 kHz group, 27 MHz, ratio, MCLK/2.
pub const REG_CLK_CTL: u8 = 0x05;
/// Interface control 1: master/slave, clock inversion, ADC/DAC format.
pub const REG_IFACE_CTL1: u8 = 0x06;
/// Interface control 2: SCLK=MCLK, mic bias level.
pub const REG_IFACE_CTL2: u8 = 0x07;
/// Input A select (PGA / ADC mux).
pub const REG_ADC_PGA_A: u8 = 0x08;
/// Input B select (PGA / ADC mux).
pub const REG_ADC_PGA_B: u8 = 0x09;
/// Analog and high-pass filter control.
pub const REG_ANALOG_HPF_CTL: u8 = 0x0A;
/// ADC high-pass filter corner frequency.
pub const REG_ADC_HPF_FREQ: u8 = 0x0B;
/// ADC miscellaneous control.
pub const REG_ADC_MISC_CTL: u8 = 0x0C;
/// Playback control 1: headphone gain, PCM invert, master mute.
pub const REG_PB_CTL1: u8 = 0x0D;
/// Miscellaneous control: passthrough, soft ramp, zero cross.
pub const REG_MISC_CTL: u8 = 0x0E;
/// Playback control 2: headphone / speaker mute.
pub const REG_PB_CTL2: u8 = 0x0F;
/// Mic A amplifier control.
pub const REG_MICA_CTL: u8 = 0x10;
/// Mic B amplifier control.
pub const REG_MICB_CTL: u8 = 0x11;
/// PGA A volume.
pub const REG_PGAA_CTL: u8 = 0x12;
/// PGA B volume.
pub const REG_PGAB_CTL: u8 = 0x13;
/// Passthrough A volume.
pub const REG_PASSTHRUA_VOL: u8 = 0x14;
/// Passthrough B volume.
pub const REG_PASSTHRUB_VOL: u8 = 0x15;
/// ADC A volume.
pub const REG_ADCA_VOL: u8 = 0x16;
/// ADC B volume.
pub const REG_ADCB_VOL: u8 = 0x17;
/// ADC mixer channel A volume / mute.
pub const REG_ADCA_MIXER_VOL: u8 = 0x18;
/// ADC mixer channel B volume / mute.
pub const REG_ADCB_MIXER_VOL: u8 = 0x19;
/// PCM mixer channel A volume / mute.
pub const REG_PCMA_MIXER_VOL: u8 = 0x1A;
/// PCM mixer channel B volume / mute.
pub const REG_PCMB_MIXER_VOL: u8 = 0x1B;
/// Beep frequency and on time.
pub const REG_BEEP_FREQ: u8 = 0x1C;
/// Beep volume and off time.
pub const REG_BEEP_VOL: u8 = 0x1D;
/// Beep configuration and tone control enables.
pub const REG_BEEP_TONE_CTL: u8 = 0x1E;
/// Tone control: treble \[7:4\], bass \[3:0\].
pub const REG_TONE_CTL: u8 = 0x1F;
/// Master volume A.
pub const REG_MASTERA_VOL: u8 = 0x20;
/// Master volume B.
pub const REG_MASTERB_VOL: u8 = 0x21;
/// Headphone volume A.
pub const REG_HPA_VOL: u8 = 0x22;
/// Headphone volume B.
pub const REG_HPB_VOL: u8 = 0x23;
/// Speaker volume A.
pub const REG_SPKA_VOL: u8 = 0x24;
/// Speaker volume B.
pub const REG_SPKB_VOL: u8 = 0x25;
/// ADC / PCM channel mixer.
pub const REG_ADC_PCM_MIXER: u8 = 0x26;
/// Limiter control 1: thresholds.
pub const REG_LIMITER_CTL1: u8 = 0x27;
/// Limiter control 2: enable, release rate.
pub const REG_LIMITER_CTL2: u8 = 0x28;
/// Limiter attack rate.
pub const REG_LIMITER_AT_RATE: u8 = 0x29;
/// ALC enable and attack rate.
pub const REG_ALC_CTL: u8 = 0x2A;
/// ALC release rate.
pub const REG_ALC_RATE: u8 = 0x2B;
/// ALC thresholds.
pub const REG_ALC_THRESHOLD: u8 = 0x2C;
/// Noise gate control.
pub const REG_NOISE_GATE_CTL: u8 = 0x2D;
/// Overflow and clock status (read-only).
pub const REG_CLK_STATUS: u8 = 0x2E;
/// Battery compensation.
pub const REG_BATT_COMPEN: u8 = 0x2F;
/// VP battery level (read-only).
pub const REG_BATT_LEVEL: u8 = 0x30;
/// Speaker status (read-only).
pub const REG_SPK_STATUS: u8 = 0x31;
/// Temperature monitor control.
pub const REG_TEMP_CTL: u8 = 0x32;
/// Thermal foldback.
pub const REG_THERMAL_FOLDBACK: u8 = 0x33;
/// Charge pump frequency.
pub const REG_CHARGE_PUMP: u8 = 0x34;

/// Number of cached registers (0x00 ..= 0x34).
pub const REGISTER_COUNT: usize = 53;

/// Largest block a single SMBus read may return.
pub const SMBUS_BLOCK_MAX: usize = 32;

/// MAP bit 7: auto-increment the address pointer during block transfers.
pub const MAP_AUTO_INCREMENT: u8 = 0x80;

/// 7-bit I2C address with AD0 pulled low (CDB42L52 / OMAP3 board wiring).
pub const CS42L52_I2C_ADDR_AD0_LOW: u8 = 0x4A;
/// 7-bit I2C address with AD0 pulled high.
pub const CS42L52_I2C_ADDR_AD0_HIGH: u8 = 0x4B;

// ---------------------------------------------------------------------------
// Register field values
// ---------------------------------------------------------------------------

/// REG_CHIP: chip identification field.
pub const CHIP_ID: u8 = 0xE0;
/// REG_CHIP: mask selecting the identification field.
pub const CHIP_ID_MASK: u8 = 0xF8;
/// REG_CHIP: mask selecting the revision field.
pub const CHIP_REV_MASK: u8 = 0x07;

/// PWRCTL1: charge pump power-down.
pub const PWRCTL1_PDN_CHRG: u8 = 1 << 7;
/// PWRCTL1: PGA B power-down.
pub const PWRCTL1_PDN_PGAB: u8 = 1 << 4;
/// PWRCTL1: PGA A power-down.
pub const PWRCTL1_PDN_PGAA: u8 = 1 << 3;
/// PWRCTL1: ADC B power-down.
pub const PWRCTL1_PDN_ADCB: u8 = 1 << 2;
/// PWRCTL1: ADC A power-down.
pub const PWRCTL1_PDN_ADCA: u8 = 1 << 1;
/// PWRCTL1: whole-codec power-down.
pub const PWRCTL1_PDN_CODEC: u8 = 1 << 0;
/// PWRCTL1: every defined bit; bits 6:5 are reserved and written as zero.
pub const PWRCTL1_PDN_ALL: u8 = PWRCTL1_PDN_CHRG
    | PWRCTL1_PDN_PGAB
    | PWRCTL1_PDN_PGAA
    | PWRCTL1_PDN_ADCB
    | PWRCTL1_PDN_ADCA
    | PWRCTL1_PDN_CODEC;

/// PWRCTL2: mic B power-down.
pub const PWRCTL2_PDN_MICB: u8 = 1 << 2;
/// PWRCTL2: mic A power-down.
pub const PWRCTL2_PDN_MICA: u8 = 1 << 1;
/// PWRCTL2: mic bias power-down.
pub const PWRCTL2_PDN_MICBIAS: u8 = 1 << 0;
/// PWRCTL2: the bias-generation power-down group.
pub const PWRCTL2_PDN_ALL: u8 = PWRCTL2_PDN_MICB | PWRCTL2_PDN_MICA | PWRCTL2_PDN_MICBIAS;

/// CLK_CTL: auto-detect speed mode and MCLK ratio.
pub const CLK_CTL_AUTO: u8 = 1 << 7;
/// CLK_CTL: SPEED\[1:0\] position.
pub const CLK_CTL_SPEED_SHIFT: u8 = 5;
/// CLK_CTL: 32 kHz group bit position.
pub const CLK_CTL_32K_SR_SHIFT: u8 = 4;
/// CLK_CTL: 27 MHz video clock bit position.
pub const CLK_CTL_27M_MCLK_SHIFT: u8 = 3;
/// CLK_CTL: RATIO\[1:0\] position.
pub const CLK_CTL_RATIO_SHIFT: u8 = 1;
/// CLK_CTL: MCLK divide-by-2 bit position.
pub const CLK_CTL_MCLKDIV2_SHIFT: u8 = 0;

/// IFACE_CTL1: codec drives SCLK and LRCK.
pub const IFACE_CTL1_MASTER: u8 = 1 << 7;
/// IFACE_CTL1: invert SCLK polarity.
pub const IFACE_CTL1_INV_SCLK: u8 = 1 << 6;
/// IFACE_CTL1: ADC output I²S (clear = left-justified).
pub const IFACE_CTL1_ADC_FMT_I2S: u8 = 1 << 5;
/// IFACE_CTL1: ADC output left-justified.
pub const IFACE_CTL1_ADC_FMT_LEFT_J: u8 = 0;
/// IFACE_CTL1: DSP mode.
pub const IFACE_CTL1_DSP_MODE_EN: u8 = 1 << 4;
/// IFACE_CTL1: DAC input left-justified.
pub const IFACE_CTL1_DAC_FMT_LEFT_J: u8 = 0;
/// IFACE_CTL1: DAC input I²S.
pub const IFACE_CTL1_DAC_FMT_I2S: u8 = 1 << 2;
/// IFACE_CTL1: DAC input right-justified.
pub const IFACE_CTL1_DAC_FMT_RIGHT_J: u8 = 2 << 2;

/// PB_CTL1: channel B master mute.
pub const PB_CTL1_MSTB_MUTE: u8 = 1 << 1;
/// PB_CTL1: channel A master mute.
pub const PB_CTL1_MSTA_MUTE: u8 = 1 << 0;
/// PB_CTL1: every bit except the two master mutes.
pub const PB_CTL1_MUTE_MASK: u8 = !(PB_CTL1_MSTB_MUTE | PB_CTL1_MSTA_MUTE);

/// TEMP_CTL: bit toggled high then low by the required setup sequence.
pub const TEMP_CTL_SETUP_TOGGLE: u8 = 1 << 7;

/// Required setup sequence (DS680 §4.11), as (register, value) pairs written
/// before and after the REG_TEMP_CTL toggle.
pub const REQUIRED_SETUP_PRELUDE: [(u8, u8); 3] = [(0x00, 0x99), (0x3E, 0xBA), (0x47, 0x80)];
/// Closing write of the required setup sequence.
pub const REQUIRED_SETUP_EPILOGUE: (u8, u8) = (0x00, 0x00);

/// Power-on default of every cached register, indexed by address.
pub const DEFAULTS: [u8; REGISTER_COUNT] = [
    0x00, 0xE0, 0x01, 0x07, 0x05, // 0x00
    0xA0, 0x00, 0x00, 0x81, // 0x05
    0x81, 0xA5, 0x00, 0x00, // 0x09
    0x60, 0x02, 0x00, 0x00, // 0x0D
    0x00, 0x00, 0x00, 0x00, // 0x11
    0x00, 0x00, 0x00, 0x80, // 0x15
    0x80, 0x00, 0x00, 0x00, // 0x19
    0x00, 0x00, 0x88, 0x00, // 0x1D
    0x00, 0x00, 0x00, 0x00, // 0x21
    0x00, 0x00, 0x00, 0x7F, // 0x25
    0xC0, 0x00, 0x3F, 0x00, // 0x29
    0x00, 0x00, 0x00, 0x00, // 0x2D
    0x00, 0x3B, 0x00, 0x5F, // 0x31
];

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    #[test]
    fn register_count_covers_last_register() {
        assert_eq!(usize::from(REG_CHARGE_PUMP) + 1, REGISTER_COUNT);
    }

    #[test]
    fn two_smbus_blocks_cover_the_map() {
        assert!(REGISTER_COUNT <= 2 * SMBUS_BLOCK_MAX);
    }

    #[test]
    fn default_chip_id_matches_identification_field() {
        assert_eq!(DEFAULTS[usize::from(REG_CHIP)] & CHIP_ID_MASK, CHIP_ID);
    }

    #[test]
    fn pwrctl1_pdn_all_leaves_reserved_bits_clear() {
        assert_eq!(PWRCTL1_PDN_ALL, 0x9F);
    }

    #[test]
    fn pwrctl2_pdn_all_is_low_three_bits() {
        assert_eq!(PWRCTL2_PDN_ALL, 0x07);
    }

    #[test]
    fn clock_fields_are_disjoint() {
        let speed = 0b11 << CLK_CTL_SPEED_SHIFT;
        let group = 1 << CLK_CTL_32K_SR_SHIFT;
        let video = 1 << CLK_CTL_27M_MCLK_SHIFT;
        let ratio = 0b11 << CLK_CTL_RATIO_SHIFT;
        let div2 = 1 << CLK_CTL_MCLKDIV2_SHIFT;
        let fields: [u8; 6] = [CLK_CTL_AUTO, speed, group, video, ratio, div2];
        let mut seen = 0u8;
        for f in fields {
            assert_eq!(seen & f, 0, "field {f:#010b} overlaps");
            seen |= f;
        }
        assert_eq!(seen, 0xFF);
    }

    #[test]
    fn mute_mask_excludes_mute_bits() {
        assert_eq!(PB_CTL1_MUTE_MASK, 0xFC);
    }

    #[test]
    fn i2c_addresses_are_adjacent() {
        assert_eq!(CS42L52_I2C_ADDR_AD0_HIGH, CS42L52_I2C_ADDR_AD0_LOW + 1);
    }
}
