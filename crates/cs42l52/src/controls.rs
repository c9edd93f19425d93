//! Mixer controls
//!
//! Each control maps a user-facing level onto a register bitfield. The field
//! width is derived from the larger of the control's raw `min` / `max`:
//!
//! ```text
//! mask = (1 << bits_needed(max(min, max))) - 1
//! get  = ((reg >> shift) - min) & mask
//! put  = ((user + min) & mask) << shift
//! ```
//!
//! All arithmetic wraps, so a non-zero `min` lets a signed register scale
//! start at zero for the user. For example master volume stores -102 dB as
//! raw 0x34, which reads back as user level 0.
//!
//! Inverted controls (mutes stored as "1 = off") flip the level around `max`
//! before encoding and after decoding.
//!
//! Writes always go through [`RegisterCache::update_bits`], so bits outside
//! `mask << shift` are preserved. The shipped [`CONTROLS`] table never lets
//! two controls share a bit. A field placed past bit 7 fails with
//! [`Error::InvalidField`] before any register is touched.

use crate::cache::RegisterCache;
use crate::error::{Error, Result};
use crate::registers::{
    REG_BEEP_TONE_CTL, REG_HPA_VOL, REG_HPB_VOL, REG_MASTERA_VOL, REG_MASTERB_VOL, REG_PB_CTL1,
    REG_PCMA_MIXER_VOL, REG_PCMB_MIXER_VOL, REG_SPKA_VOL, REG_SPKB_VOL, REG_TONE_CTL,
};
use crate::transport::Transport;

/// Where a control's bits live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlKind {
    /// One register; a second channel, if any, sits at `rshift` in the same
    /// register.
    SingleRegister {
        /// Register address.
        reg: u8,
        /// Bit position of the (left) field.
        shift: u8,
        /// Bit position of the right field for stereo controls.
        rshift: Option<u8>,
    },
    /// Left and right channels in two registers at the same bit position.
    TwoRegisterStereo {
        /// Left channel register.
        left: u8,
        /// Right channel register.
        right: u8,
        /// Bit position of the field in both registers.
        shift: u8,
    },
}

/// Value type reported by [`MixerControl::info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlType {
    /// On / off switch.
    Boolean,
    /// Stepped level.
    Integer,
}

/// Shape of a control as seen by a mixer front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlInfo {
    /// Switch or level.
    pub kind: ControlType,
    /// Number of channels (1 or 2).
    pub count: u8,
    /// Lowest user level.
    pub min: u32,
    /// Highest user level.
    pub max: u32,
}

/// A named mixer control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MixerControl {
    /// Name shown to the user.
    pub name: &'static str,
    /// Register placement.
    pub kind: ControlKind,
    /// Raw register value for user level 0.
    pub min: u32,
    /// Raw register value for the highest user level.
    pub max: u32,
    /// Store `max - level` instead of `level`.
    pub invert: bool,
}

impl MixerControl {
    /// Field mask before shifting, sized to hold `max(min, max)`.
    pub fn mask(&self) -> u32 {
        let bits = u32::BITS.saturating_sub(self.min.max(self.max).leading_zeros());
        1u32.checked_shl(bits).map_or(u32::MAX, |m| m.wrapping_sub(1))
    }

    /// Number of channels this control carries.
    pub fn channels(&self) -> u8 {
        match self.kind {
            ControlKind::SingleRegister { rshift: None, .. } => 1,
            ControlKind::SingleRegister { rshift: Some(_), .. }
            | ControlKind::TwoRegisterStereo { .. } => 2,
        }
    }

    /// Type, channel count and user range.
    pub fn info(&self) -> ControlInfo {
        ControlInfo {
            kind: if self.max == 1 {
                ControlType::Boolean
            } else {
                ControlType::Integer
            },
            count: self.channels(),
            min: 0,
            max: self.max.wrapping_sub(self.min),
        }
    }

    /// Current user level(s), read from the cache.
    ///
    /// The second value is present only for stereo controls.
    pub fn get<T: Transport>(&self, cache: &RegisterCache<T>) -> Result<(u32, Option<u32>)> {
        match self.kind {
            ControlKind::SingleRegister { reg, shift, rshift } => {
                let raw = cache.read(reg)?;
                let left = self.decode(raw, bit_position(reg, shift)?);
                let right = rshift
                    .filter(|&r| r != shift)
                    .map(|r| bit_position(reg, r).map(|r| self.decode(raw, r)))
                    .transpose()?;
                Ok((left, right))
            }
            ControlKind::TwoRegisterStereo { left, right, shift } => {
                self.get_2r(cache, left, right, shift)
            }
        }
    }

    /// Set the user level(s).
    ///
    /// For stereo controls a missing `right` level applies `left` to both
    /// channels. Mono controls ignore `right`.
    pub fn put<T: Transport>(
        &self,
        cache: &mut RegisterCache<T>,
        left: u32,
        right: Option<u32>,
    ) -> Result<()> {
        let right = right.unwrap_or(left);
        match self.kind {
            ControlKind::SingleRegister { reg, shift, rshift } => {
                let shift = bit_position(reg, shift)?;
                let mut field = self.field_mask(shift);
                let mut value = self.encode(left, shift);
                if let Some(r) = rshift.filter(|&r| u32::from(r) != shift) {
                    let r = bit_position(reg, r)?;
                    field |= self.field_mask(r);
                    value |= self.encode(right, r);
                }
                trace!("control {} -> reg {:#x} mask {:#x}", self.name, reg, field);
                cache.update_bits(reg, field, value)
            }
            ControlKind::TwoRegisterStereo {
                left: left_reg,
                right: right_reg,
                shift,
            } => self.put_2r(cache, (left_reg, right_reg), shift, left, right),
        }
    }

    fn get_2r<T: Transport>(
        &self,
        cache: &RegisterCache<T>,
        left: u8,
        right: u8,
        shift: u8,
    ) -> Result<(u32, Option<u32>)> {
        let shift = bit_position(left, shift)?;
        let l = self.decode(cache.read(left)?, shift);
        let r = self.decode(cache.read(right)?, shift);
        Ok((l, Some(r)))
    }

    fn put_2r<T: Transport>(
        &self,
        cache: &mut RegisterCache<T>,
        (left_reg, right_reg): (u8, u8),
        shift: u8,
        left: u32,
        right: u32,
    ) -> Result<()> {
        let shift = bit_position(left_reg, shift)?;
        let field = self.field_mask(shift);
        trace!(
            "control {} -> regs {:#x}/{:#x} mask {:#x}",
            self.name,
            left_reg,
            right_reg,
            field
        );
        cache.update_bits(left_reg, field, self.encode(left, shift))?;
        cache.update_bits(right_reg, field, self.encode(right, shift))
    }

    fn decode(&self, raw: u8, shift: u32) -> u32 {
        let level = u32::from(raw).wrapping_shr(shift).wrapping_sub(self.min) & self.mask();
        if self.invert {
            self.max.wrapping_sub(level)
        } else {
            level
        }
    }

    // Register fields are at most 8 bits wide, so the truncation keeps every
    // meaningful bit.
    #[allow(clippy::cast_possible_truncation)]
    fn encode(&self, level: u32, shift: u32) -> u8 {
        let level = if self.invert {
            self.max.wrapping_sub(level)
        } else {
            level
        };
        (level.wrapping_add(self.min) & self.mask()).wrapping_shl(shift) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    fn field_mask(&self, shift: u32) -> u8 {
        self.mask().wrapping_shl(shift) as u8
    }
}

/// Bit position of a field inside the 8-bit register `reg`.
fn bit_position(reg: u8, shift: u8) -> Result<u32> {
    if u32::from(shift) < u8::BITS {
        Ok(u32::from(shift))
    } else {
        Err(Error::InvalidField { reg, shift })
    }
}

const fn stereo_2r(name: &'static str, left: u8, right: u8, max: u32, min: u32) -> MixerControl {
    MixerControl {
        name,
        kind: ControlKind::TwoRegisterStereo {
            left,
            right,
            shift: 0,
        },
        min,
        max,
        invert: false,
    }
}

const fn double(name: &'static str, reg: u8, shift: u8, rshift: u8, invert: bool) -> MixerControl {
    MixerControl {
        name,
        kind: ControlKind::SingleRegister {
            reg,
            shift,
            rshift: Some(rshift),
        },
        min: 0,
        max: 1,
        invert,
    }
}

const fn single(name: &'static str, reg: u8, shift: u8, max: u32, min: u32) -> MixerControl {
    MixerControl {
        name,
        kind: ControlKind::SingleRegister {
            reg,
            shift,
            rshift: None,
        },
        min,
        max,
        invert: false,
    }
}

/// Every control the codec exposes.
pub static CONTROLS: [MixerControl; 10] = [
    stereo_2r("Master Playback Volume", REG_MASTERA_VOL, REG_MASTERB_VOL, 0xE4, 0x34),
    double("Master Playback Switch", REG_PB_CTL1, 1, 0, true),
    stereo_2r("PCM Mixer Playback Volume", REG_PCMA_MIXER_VOL, REG_PCMB_MIXER_VOL, 0x7F, 0x19),
    MixerControl {
        name: "PCM Mixer Playback Switch",
        kind: ControlKind::TwoRegisterStereo {
            left: REG_PCMA_MIXER_VOL,
            right: REG_PCMB_MIXER_VOL,
            shift: 7,
        },
        min: 0,
        max: 1,
        invert: true,
    },
    double("PCM Invert Switch", REG_PB_CTL1, 3, 2, false),
    single("Treble Gain Playback Volume", REG_TONE_CTL, 4, 15, 1),
    single("Bass Gain Playback Volume", REG_TONE_CTL, 0, 15, 1),
    stereo_2r("Speaker Gain", REG_SPKA_VOL, REG_SPKB_VOL, 0xFF, 0x01),
    stereo_2r("Headphones Gain", REG_HPA_VOL, REG_HPB_VOL, 0xFF, 0x01),
    double("Beep", REG_BEEP_TONE_CTL, 7, 6, false),
];

/// Look a control up by name.
pub fn find(name: &str) -> Result<&'static MixerControl> {
    CONTROLS
        .iter()
        .find(|c| c.name == name)
        .ok_or(Error::UnknownControl)
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

    fn cache() -> RegisterCache<MockTransport> {
        RegisterCache::new(MockTransport::new())
    }

    #[test]
    fn mask_follows_highest_bit() {
        assert_eq!(find("Master Playback Volume").unwrap().mask(), 0xFF);
        assert_eq!(find("PCM Mixer Playback Volume").unwrap().mask(), 0x7F);
        assert_eq!(find("Treble Gain Playback Volume").unwrap().mask(), 0x0F);
        assert_eq!(find("Beep").unwrap().mask(), 0x01);
    }

    #[test]
    fn master_volume_round_trips_through_offset() {
        let mut cache = cache();
        let master = find("Master Playback Volume").unwrap();

        master.put(&mut cache, 0, Some(0)).unwrap();
        assert_eq!(cache.read(REG_MASTERA_VOL).unwrap(), 0x34);
        assert_eq!(master.get(&cache).unwrap(), (0, Some(0)));

        master.put(&mut cache, 176, Some(176)).unwrap();
        assert_eq!(cache.read(REG_MASTERB_VOL).unwrap(), 0xE4);
        assert_eq!(master.get(&cache).unwrap(), (176, Some(176)));
    }

    #[test]
    fn two_register_put_writes_each_channel() {
        let mut cache = cache();
        let master = find("Master Playback Volume").unwrap();
        master.put(&mut cache, 5, Some(9)).unwrap();
        assert_eq!(cache.read(REG_MASTERA_VOL).unwrap(), 0x34 + 5);
        assert_eq!(cache.read(REG_MASTERB_VOL).unwrap(), 0x34 + 9);
        assert_eq!(cache.transport().writes.len(), 2);
    }

    #[test]
    fn missing_right_level_applies_left_to_both() {
        let mut cache = cache();
        let speaker = find("Speaker Gain").unwrap();
        speaker.put(&mut cache, 0x40, None).unwrap();
        assert_eq!(speaker.get(&cache).unwrap(), (0x40, Some(0x40)));
    }

    #[test]
    fn pcm_volume_preserves_mute_bit() {
        let mut cache = cache();
        cache.write(REG_PCMA_MIXER_VOL, 0x80).unwrap();
        let pcm = find("PCM Mixer Playback Volume").unwrap();
        pcm.put(&mut cache, 0x10, Some(0x10)).unwrap();
        assert_eq!(cache.read(REG_PCMA_MIXER_VOL).unwrap(), 0x80 | 0x29);
    }

    #[test]
    fn treble_and_bass_share_tone_register() {
        let mut cache = cache();
        let treble = find("Treble Gain Playback Volume").unwrap();
        let bass = find("Bass Gain Playback Volume").unwrap();

        // Power-on 0x88 decodes as 7 for both halves (raw 8 minus offset 1).
        assert_eq!(treble.get(&cache).unwrap(), (7, None));
        assert_eq!(bass.get(&cache).unwrap(), (7, None));

        treble.put(&mut cache, 2, None).unwrap();
        assert_eq!(cache.read(REG_TONE_CTL).unwrap(), 0x38);
        assert_eq!(bass.get(&cache).unwrap(), (7, None));
    }

    #[test]
    fn levels_wrap_modulo_field_width() {
        let mut cache = cache();
        let treble = find("Treble Gain Playback Volume").unwrap();
        // (15 + 1) & 0xF == 0: wraps to raw zero without touching bass.
        treble.put(&mut cache, 15, None).unwrap();
        assert_eq!(cache.read(REG_TONE_CTL).unwrap(), 0x08);
        assert_eq!(treble.get(&cache).unwrap(), (15, None));
    }

    #[test]
    fn inverted_switch_stores_complement() {
        let mut cache = cache();
        cache.write(REG_PB_CTL1, 0x60).unwrap();
        let switch = find("Master Playback Switch").unwrap();

        // Mute bits clear: both channels on.
        assert_eq!(switch.get(&cache).unwrap(), (1, Some(1)));

        switch.put(&mut cache, 0, Some(1)).unwrap();
        // Left (shift 1) off -> bit 1 set; right (shift 0) on -> bit 0 clear.
        assert_eq!(cache.read(REG_PB_CTL1).unwrap(), 0x62);
        assert_eq!(switch.get(&cache).unwrap(), (0, Some(1)));
    }

    #[test]
    fn pcm_switch_uses_bit_seven_of_both_registers() {
        let mut cache = cache();
        let switch = find("PCM Mixer Playback Switch").unwrap();
        switch.put(&mut cache, 0, Some(0)).unwrap();
        assert_eq!(cache.read(REG_PCMA_MIXER_VOL).unwrap() & 0x80, 0x80);
        assert_eq!(cache.read(REG_PCMB_MIXER_VOL).unwrap() & 0x80, 0x80);
        assert_eq!(switch.get(&cache).unwrap(), (0, Some(0)));
    }

    #[test]
    fn info_reports_user_range() {
        let master = find("Master Playback Volume").unwrap().info();
        assert_eq!(master.kind, ControlType::Integer);
        assert_eq!(master.count, 2);
        assert_eq!((master.min, master.max), (0, 176));

        let beep = find("Beep").unwrap().info();
        assert_eq!(beep.kind, ControlType::Boolean);
        assert_eq!(beep.max, 1);

        assert_eq!(find("Bass Gain Playback Volume").unwrap().info().count, 1);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(find("Capture Volume"), Err(Error::UnknownControl));
    }

    #[test]
    fn failed_left_write_aborts_right() {
        let mut t = MockTransport::new();
        t.short_write = Some(0);
        let mut cache = RegisterCache::new(t);
        let master = find("Master Playback Volume").unwrap();
        assert_eq!(
            master.put(&mut cache, 1, Some(2)),
            Err(Error::TransportWrite {
                reg: REG_MASTERA_VOL,
                written: 0
            })
        );
        assert_eq!(cache.transport().writes.len(), 1);
    }

    #[test]
    fn field_beyond_register_width_is_rejected() {
        let mut cache = cache();
        let wide = MixerControl {
            name: "Wide",
            kind: ControlKind::SingleRegister {
                reg: REG_TONE_CTL,
                shift: 40,
                rshift: None,
            },
            min: 0,
            max: 1,
            invert: false,
        };
        let field: Result<(u32, Option<u32>)> = Err(Error::InvalidField {
            reg: REG_TONE_CTL,
            shift: 40,
        });
        assert_eq!(wide.get(&cache), field);
        assert_eq!(wide.put(&mut cache, 1, None), field.map(|_| ()));

        let stereo = MixerControl {
            kind: ControlKind::SingleRegister {
                reg: REG_TONE_CTL,
                shift: 0,
                rshift: Some(8),
            },
            ..wide
        };
        assert!(stereo.get(&cache).is_err());
        assert!(stereo.put(&mut cache, 1, Some(1)).is_err());

        let two_reg = MixerControl {
            kind: ControlKind::TwoRegisterStereo {
                left: REG_MASTERA_VOL,
                right: REG_MASTERB_VOL,
                shift: 255,
            },
            ..wide
        };
        assert!(two_reg.get(&cache).is_err());
        assert!(two_reg.put(&mut cache, 1, None).is_err());
        assert!(cache.transport().writes.is_empty());
    }

    #[test]
    fn top_bit_field_is_accepted() {
        let mut cache = cache();
        let switch = find("PCM Mixer Playback Switch").unwrap();
        switch.put(&mut cache, 1, Some(1)).unwrap();
        assert_eq!(switch.get(&cache).unwrap(), (1, Some(1)));
    }

    #[test]
    fn find_returns_entry_of_shared_table() {
        let bass = find("Bass Gain Playback Volume").unwrap();
        assert!(core::ptr::eq(bass, &CONTROLS[6]));
    }

    #[test]
    fn shipped_controls_never_share_bits() {
        let mut used = [0u8; crate::registers::REGISTER_COUNT];
        let mut claim = |reg: u8, bits: u8, name: &str| {
            let slot = &mut used[usize::from(reg)];
            assert_eq!(*slot & bits, 0, "{name} overlaps on reg {reg:#x}");
            *slot |= bits;
        };
        for c in &CONTROLS {
            match c.kind {
                ControlKind::SingleRegister { reg, shift, rshift } => {
                    claim(reg, c.field_mask(shift.into()), c.name);
                    if let Some(r) = rshift {
                        claim(reg, c.field_mask(r.into()), c.name);
                    }
                }
                ControlKind::TwoRegisterStereo { left, right, shift } => {
                    claim(left, c.field_mask(shift.into()), c.name);
                    claim(right, c.field_mask(shift.into()), c.name);
                }
            }
        }
    }

    #[test]
    fn control_names_are_unique() {
        for (i, a) in CONTROLS.iter().enumerate() {
            for b in CONTROLS.iter().skip(i + 1) {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
