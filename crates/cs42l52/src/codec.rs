//! CS42L52 codec driver
//!
//! Ties the register cache, clock resolver, DAI format, bias state machine
//! and mixer controls together behind the operations an audio framework
//! calls.
//!
//! # Attach sequence
//!
//! ```text
//! read REG_CHIP ──(id & 0xF8 != 0xE0)──→ Error::UnknownDevice
//!     ↓
//! required setup (raw writes outside the cache)
//!   00←99, 3E←BA, 47←80, read 32, 32←d|80, 32←d&7F, 00←00
//!     ↓
//! cache from defaults → bulk_sync → bias Standby
//! ```

use crate::bias::{self, BiasLevel};
use crate::cache::RegisterCache;
use crate::clock::{self, ClockTableEntry};
use crate::config::{ClockMode, CodecConfig};
use crate::controls::{self, MixerControl, CONTROLS};
use crate::dai::DaiFormat;
use crate::error::{Error, Result};
use crate::registers::{
    CHIP_ID, CHIP_ID_MASK, CHIP_REV_MASK, PB_CTL1_MSTA_MUTE, PB_CTL1_MSTB_MUTE,
    PB_CTL1_MUTE_MASK, REG_CHIP, REG_CLK_CTL, REG_IFACE_CTL1, REG_PB_CTL1, REG_PWRCTL1,
    REG_TEMP_CTL, REQUIRED_SETUP_EPILOGUE, REQUIRED_SETUP_PRELUDE, TEMP_CTL_SETUP_TOGGLE,
};
use crate::transport::Transport;

/// An attached CS42L52.
pub struct Cs42l52<T> {
    cache: RegisterCache<T>,
    clock_mode: ClockMode,
    sysclk_hz: u32,
    format: DaiFormat,
    iface: u8,
    bias: BiasLevel,
    revision: u8,
}

impl<T: Transport> Cs42l52<T> {
    /// Identify the chip, run its required setup, load the register cache
    /// and bring it to [`BiasLevel::Standby`].
    ///
    /// `config` is validated before any bus traffic. If a later step fails
    /// the transport is dropped with the partially built driver.
    pub fn attach(mut transport: T, config: CodecConfig) -> Result<Self> {
        if !CodecConfig::sysclk_in_range(config.sysclk_hz) {
            return Err(Error::InvalidClock {
                hz: config.sysclk_hz,
            });
        }
        let iface = config.format.iface_bits()?;

        let id = read_raw(&mut transport, REG_CHIP)?;
        if id & CHIP_ID_MASK != CHIP_ID {
            error!("unexpected chip id {:#x}", id);
            return Err(Error::UnknownDevice { id });
        }
        let revision = id & CHIP_REV_MASK;
        info!("CS42L52 revision {}", revision);

        required_setup(&mut transport)?;

        let mut cache = RegisterCache::new(transport);
        cache.bulk_sync()?;

        let mut codec = Self {
            cache,
            clock_mode: config.clock_mode,
            sysclk_hz: config.sysclk_hz,
            format: config.format,
            iface,
            bias: BiasLevel::Off,
            revision,
        };
        codec.set_bias_level(BiasLevel::Standby)?;
        Ok(codec)
    }

    /// Power the chip down and give the transport back.
    pub fn detach(mut self) -> Result<T> {
        self.set_bias_level(BiasLevel::Off)?;
        Ok(self.cache.into_transport())
    }

    /// Silicon revision read at attach.
    pub fn revision(&self) -> u8 {
        self.revision
    }

    /// Set the reference clock frequency on MCLK.
    ///
    /// Accepts 11 MHz ..= 27 MHz. Takes effect at the next
    /// [`Self::hw_params`].
    pub fn set_sysclk(&mut self, hz: u32) -> Result<()> {
        if !CodecConfig::sysclk_in_range(hz) {
            error!("sysclk {} Hz out of range", hz);
            return Err(Error::InvalidClock { hz });
        }
        self.sysclk_hz = hz;
        info!("sysclk {} Hz", hz);
        Ok(())
    }

    /// Current reference clock in Hz.
    pub fn sysclk(&self) -> u32 {
        self.sysclk_hz
    }

    /// Set the serial port format. Takes effect at the next
    /// [`Self::hw_params`].
    pub fn set_fmt(&mut self, format: DaiFormat) -> Result<()> {
        self.iface = format.iface_bits()?;
        self.format = format;
        debug!("iface format {:#x}", self.iface);
        Ok(())
    }

    /// Current serial port format.
    pub fn format(&self) -> DaiFormat {
        self.format
    }

    /// Program clocks and interface format for a stream at `rate_hz`.
    ///
    /// The chosen table entry's MCLK becomes the new sysclk. CLK_CTL is
    /// written according to [`ClockMode`], then IFACE_CTL1.
    pub fn hw_params(&mut self, rate_hz: u32) -> Result<&'static ClockTableEntry> {
        let entry = clock::resolve(self.sysclk_hz, rate_hz)?;
        self.sysclk_hz = entry.mclk_hz;

        let clk_ctl = match self.clock_mode {
            ClockMode::Manual => entry.register_value(),
            ClockMode::Auto => ClockMode::AUTO_REGISTER_VALUE,
        };
        info!("hw_params {} Hz: CLK_CTL {:#x}", rate_hz, clk_ctl);
        self.cache.write(REG_CLK_CTL, clk_ctl)?;
        self.cache.write(REG_IFACE_CTL1, self.iface)?;
        Ok(entry)
    }

    /// Mute or unmute both master channels.
    pub fn digital_mute(&mut self, mute: bool) -> Result<()> {
        let mut value = self.cache.read(REG_PB_CTL1)? & PB_CTL1_MUTE_MASK;
        if mute {
            value |= PB_CTL1_MSTB_MUTE | PB_CTL1_MSTA_MUTE;
        }
        debug!("digital mute {}", mute);
        self.cache.write(REG_PB_CTL1, value)
    }

    /// Move to `level`.
    ///
    /// The recorded level only changes once every register write succeeded.
    pub fn set_bias_level(&mut self, level: BiasLevel) -> Result<()> {
        bias::apply(&mut self.cache, level)?;
        self.bias = level;
        Ok(())
    }

    /// Last bias level successfully applied.
    pub fn bias_level(&self) -> BiasLevel {
        self.bias
    }

    /// Power down for system suspend.
    pub fn suspend(&mut self) -> Result<()> {
        self.set_bias_level(BiasLevel::Off)
    }

    /// Restore every cached register from PWRCTL1 onward, then return to
    /// standby.
    pub fn resume(&mut self) -> Result<()> {
        self.cache.flush_from(REG_PWRCTL1)?;
        self.set_bias_level(BiasLevel::Standby)
    }

    /// Every mixer control the codec exposes.
    pub fn controls(&self) -> &'static [MixerControl] {
        &CONTROLS
    }

    /// Read a mixer control by name.
    pub fn control_get(&self, name: &str) -> Result<(u32, Option<u32>)> {
        controls::find(name)?.get(&self.cache)
    }

    /// Write a mixer control by name.
    pub fn control_put(&mut self, name: &str, left: u32, right: Option<u32>) -> Result<()> {
        controls::find(name)?.put(&mut self.cache, left, right)
    }

    /// Register cache, read-only.
    pub fn cache(&self) -> &RegisterCache<T> {
        &self.cache
    }

    /// Register cache, for direct register access.
    pub fn cache_mut(&mut self) -> &mut RegisterCache<T> {
        &mut self.cache
    }
}

/// Single-register read straight from the chip.
fn read_raw<T: Transport>(transport: &mut T, reg: u8) -> Result<u8> {
    let mut buf = [0u8; 1];
    let got = transport.read_block(reg, &mut buf).unwrap_or(0);
    let [value] = buf;
    if got == 1 {
        Ok(value)
    } else {
        error!("read of reg {:#x} failed", reg);
        Err(Error::TransportRead { expected: 1, got })
    }
}

/// Single-register write straight to the chip, bypassing the cache.
fn write_raw<T: Transport>(transport: &mut T, reg: u8, value: u8) -> Result<()> {
    let written = transport.write(&[reg, value]).unwrap_or(0);
    if written == 2 {
        Ok(())
    } else {
        error!("setup write to reg {:#x} failed", reg);
        Err(Error::TransportWrite { reg, written })
    }
}

/// DS680 §4.11 power-up sequence.
fn required_setup<T: Transport>(transport: &mut T) -> Result<()> {
    for (reg, value) in REQUIRED_SETUP_PRELUDE {
        write_raw(transport, reg, value)?;
    }
    let temp = read_raw(transport, REG_TEMP_CTL)?;
    write_raw(transport, REG_TEMP_CTL, temp | TEMP_CTL_SETUP_TOGGLE)?;
    write_raw(transport, REG_TEMP_CTL, temp & !TEMP_CTL_SETUP_TOGGLE)?;
    let (reg, value) = REQUIRED_SETUP_EPILOGUE;
    write_raw(transport, reg, value)?;
    trace!("required setup done");
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use crate::dai::{ClockInversion, ClockRole, Framing};
    use crate::mock::MockTransport;
    use crate::registers::{REG_MASTERA_VOL, REG_PWRCTL2};

    fn attached() -> Cs42l52<MockTransport> {
        let mut codec = Cs42l52::attach(MockTransport::new(), CodecConfig::default()).unwrap();
        codec.cache_mut().transport_mut().clear_log();
        codec
    }

    #[test]
    fn attach_runs_setup_then_syncs_and_enters_standby() {
        let codec = Cs42l52::attach(MockTransport::new(), CodecConfig::default()).unwrap();
        let t = codec.cache().transport();
        let writes: std::vec::Vec<_> = t.writes.iter().map(|w| (w[0], w[1])).collect();
        assert_eq!(
            writes,
            std::vec![
                (0x00, 0x99),
                (0x3E, 0xBA),
                (0x47, 0x80),
                (0x32, 0xBB),
                (0x32, 0x3B),
                (0x00, 0x00),
                (0x02, 0x00),
            ]
        );
        assert_eq!(t.reads, std::vec![(0x01, 1), (0x32, 1), (0x00, 32), (0x20, 21)]);
        assert_eq!(codec.bias_level(), BiasLevel::Standby);
        assert_eq!(codec.revision(), 0);
    }

    #[test]
    fn attach_rejects_foreign_chip() {
        let mut t = MockTransport::new();
        t.registers[0x01] = 0x62;
        assert_eq!(
            Cs42l52::attach(t, CodecConfig::default()).err(),
            Some(Error::UnknownDevice { id: 0x62 })
        );
    }

    #[test]
    fn attach_reports_revision() {
        let mut t = MockTransport::new();
        t.registers[0x01] = 0xE3;
        let codec = Cs42l52::attach(t, CodecConfig::default()).unwrap();
        assert_eq!(codec.revision(), 3);
    }

    #[test]
    fn attach_validates_config_before_bus_traffic() {
        let config = CodecConfig {
            sysclk_hz: 48_000_000,
            ..CodecConfig::default()
        };
        assert_eq!(
            Cs42l52::attach(MockTransport::new(), config).err(),
            Some(Error::InvalidClock { hz: 48_000_000 })
        );
    }

    #[test]
    fn attach_fails_on_short_sync() {
        let mut t = MockTransport::new();
        t.short_read = Some(1);
        // Single-byte reads succeed, the 32-byte block read does not.
        assert_eq!(
            Cs42l52::attach(t, CodecConfig::default()).err(),
            Some(Error::TransportRead {
                expected: 53,
                got: 1
            })
        );
    }

    #[test]
    fn hw_params_writes_clock_then_format() {
        let mut codec = attached();
        let entry = codec.hw_params(48_000).unwrap();
        assert_eq!(entry.mclk_hz, 12_288_000);
        assert_eq!(
            codec.cache().transport().writes,
            std::vec![std::vec![0x05, 0x20], std::vec![0x06, 0x24]]
        );
    }

    #[test]
    fn hw_params_adopts_table_mclk() {
        let mut codec = attached();
        codec.set_sysclk(26_000_000).unwrap();
        codec.hw_params(48_000).unwrap();
        assert_eq!(codec.sysclk(), 27_000_000);
        assert_eq!(codec.cache().read(REG_CLK_CTL).unwrap(), 0x2B);
    }

    #[test]
    fn hw_params_auto_mode_writes_auto_pattern() {
        let config = CodecConfig {
            clock_mode: ClockMode::Auto,
            ..CodecConfig::default()
        };
        let mut codec = Cs42l52::attach(MockTransport::new(), config).unwrap();
        codec.hw_params(44_100).unwrap();
        assert_eq!(codec.cache().read(REG_CLK_CTL).unwrap(), 0xA0);
        assert_eq!(codec.sysclk(), 11_289_600);
    }

    #[test]
    fn hw_params_unknown_rate_writes_nothing() {
        let mut codec = attached();
        assert_eq!(
            codec.hw_params(12_345),
            Err(Error::UnsupportedRate { rate: 12_345 })
        );
        assert_eq!(codec.cache().transport().transaction_count(), 0);
        assert_eq!(codec.sysclk(), 12_288_000);
    }

    #[test]
    fn set_fmt_is_applied_at_hw_params() {
        let mut codec = attached();
        codec
            .set_fmt(DaiFormat::new(
                ClockRole::CodecMaster,
                Framing::DspA,
                ClockInversion::InvertedBitNormalFrame,
            ))
            .unwrap();
        assert_eq!(codec.cache().transport().transaction_count(), 0);
        codec.hw_params(8_000).unwrap();
        assert_eq!(codec.cache().read(REG_IFACE_CTL1).unwrap(), 0x80 | 0x40 | 0x10);
    }

    #[test]
    fn set_fmt_rejects_and_keeps_previous() {
        let mut codec = attached();
        let bad = DaiFormat {
            framing: Framing::DspB,
            ..DaiFormat::default()
        };
        assert_eq!(codec.set_fmt(bad), Err(Error::InvalidFormat));
        assert_eq!(codec.format(), DaiFormat::default());
    }

    #[test]
    fn sysclk_range_enforced() {
        let mut codec = attached();
        assert_eq!(
            codec.set_sysclk(10_000_000),
            Err(Error::InvalidClock { hz: 10_000_000 })
        );
        assert_eq!(codec.sysclk(), 12_288_000);
        codec.set_sysclk(27_000_000).unwrap();
        assert_eq!(codec.sysclk(), 27_000_000);
    }

    #[test]
    fn digital_mute_toggles_master_mute_bits() {
        let mut codec = attached();
        codec.digital_mute(true).unwrap();
        assert_eq!(codec.cache().read(REG_PB_CTL1).unwrap(), 0x63);
        codec.digital_mute(false).unwrap();
        assert_eq!(codec.cache().read(REG_PB_CTL1).unwrap(), 0x60);
    }

    #[test]
    fn suspend_resume_restores_registers() {
        let mut codec = attached();
        codec.control_put("Master Playback Volume", 100, None).unwrap();
        codec.suspend().unwrap();
        assert_eq!(codec.bias_level(), BiasLevel::Off);
        assert_eq!(codec.cache().read(REG_PWRCTL2).unwrap(), 0x07);

        // Chip loses state while powered down.
        codec.cache_mut().transport_mut().registers[0x20] = 0x00;
        codec.resume().unwrap();
        assert_eq!(codec.bias_level(), BiasLevel::Standby);
        assert_eq!(codec.cache().transport().registers[0x20], 0x34 + 100);
        assert_eq!(codec.cache().read(REG_MASTERA_VOL).unwrap(), 0x34 + 100);
    }

    #[test]
    fn failed_bias_change_keeps_previous_level() {
        let mut codec = attached();
        codec.cache_mut().transport_mut().short_write = Some(0);
        assert!(codec.set_bias_level(BiasLevel::Off).is_err());
        assert_eq!(codec.bias_level(), BiasLevel::Standby);
    }

    #[test]
    fn controls_by_name() {
        let mut codec = attached();
        codec.control_put("Headphones Gain", 10, Some(20)).unwrap();
        assert_eq!(codec.control_get("Headphones Gain").unwrap(), (10, Some(20)));
        assert_eq!(codec.control_get("Nope"), Err(Error::UnknownControl));
        assert_eq!(codec.controls().len(), 10);
    }

    #[test]
    fn detach_powers_down_and_returns_transport() {
        let codec = attached();
        let t = codec.detach().unwrap();
        assert_eq!(t.registers[0x02], 0x9F);
        assert_eq!(t.registers[0x03], 0x07);
    }
}
