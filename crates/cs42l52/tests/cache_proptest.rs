//! Property-based tests for the register cache, clock resolver and mixer
//! controls. Verifies invariants hold for all inputs, not just fixed examples.

// Test files index and do arithmetic freely; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]

use cs42l52::controls::{find, ControlKind, MixerControl};
use cs42l52::registers::{DEFAULTS, REGISTER_COUNT};
use cs42l52::{resolve, Error, RegisterCache, Transport, CLOCK_TABLE, CONTROLS};
use proptest::prelude::*;

/// Chip model: a flat register file that accepts every transfer.
struct RamChip {
    registers: [u8; REGISTER_COUNT],
    transfers: usize,
}

impl RamChip {
    fn new(registers: [u8; REGISTER_COUNT]) -> Self {
        Self {
            registers,
            transfers: 0,
        }
    }
}

impl Transport for RamChip {
    type Error = core::convert::Infallible;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.transfers += 1;
        if let [reg, value] = *data {
            if let Some(slot) = self.registers.get_mut(usize::from(reg)) {
                *slot = value;
            }
        }
        Ok(data.len())
    }

    fn read_block(&mut self, start: u8, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.transfers += 1;
        let start = usize::from(start & 0x7F);
        for (offset, dst) in buffer.iter_mut().enumerate() {
            *dst = self.registers.get(start + offset).copied().unwrap_or(0);
        }
        Ok(buffer.len())
    }
}

/// Bits `control` owns in each register of the map.
#[allow(clippy::cast_possible_truncation)]
fn owned_bits(control: &MixerControl) -> [u8; REGISTER_COUNT] {
    let field = |shift: u8| (control.mask() << shift) as u8;
    let mut owned = [0u8; REGISTER_COUNT];
    match control.kind {
        ControlKind::SingleRegister { reg, shift, rshift } => {
            owned[usize::from(reg)] = field(shift) | rshift.map_or(0, field);
        }
        ControlKind::TwoRegisterStereo { left, right, shift } => {
            owned[usize::from(left)] = field(shift);
            owned[usize::from(right)] = field(shift);
        }
    }
    owned
}

const RATES: [u32; 9] = [
    8_000, 11_025, 16_000, 22_050, 32_000, 44_100, 48_000, 88_200, 96_000,
];

proptest! {
    /// write(r, v) then read(r) returns v for every valid register.
    #[test]
    fn write_then_read_returns_value(reg in 0u8..53, value in any::<u8>()) {
        let mut cache = RegisterCache::new(RamChip::new(DEFAULTS));
        cache.write(reg, value).unwrap();
        prop_assert_eq!(cache.read(reg).unwrap(), value);
        prop_assert_eq!(cache.transport().registers[usize::from(reg)], value);
    }

    /// Out-of-range indices fail and never reach the bus.
    #[test]
    fn out_of_range_never_touches_transport(reg in 53u8..=255, value in any::<u8>()) {
        let mut cache = RegisterCache::new(RamChip::new(DEFAULTS));
        prop_assert_eq!(cache.read(reg), Err(Error::OutOfRange { reg }));
        prop_assert_eq!(cache.write(reg, value), Err(Error::OutOfRange { reg }));
        prop_assert_eq!(cache.transport().transfers, 0);
    }

    /// After bulk_sync the cache mirrors the chip byte for byte.
    #[test]
    fn bulk_sync_mirrors_chip(chip in any::<[u8; 32]>(), tail in any::<[u8; 21]>()) {
        let mut registers = [0u8; REGISTER_COUNT];
        registers[..32].copy_from_slice(&chip);
        registers[32..].copy_from_slice(&tail);

        let mut cache = RegisterCache::new(RamChip::new(registers));
        cache.bulk_sync().unwrap();
        prop_assert_eq!(cache.snapshot(), &registers);
        prop_assert_eq!(cache.transport().transfers, 2);
    }

    /// update_bits only changes bits inside the mask.
    #[test]
    fn update_bits_preserves_outside_mask(
        reg in 0u8..53,
        old in any::<u8>(),
        mask in any::<u8>(),
        value in any::<u8>(),
    ) {
        let mut cache = RegisterCache::new(RamChip::new(DEFAULTS));
        cache.write(reg, old).unwrap();
        cache.update_bits(reg, mask, value).unwrap();
        let new = cache.read(reg).unwrap();
        prop_assert_eq!(new & !mask, old & !mask);
        prop_assert_eq!(new & mask, value & mask);
    }

    /// The resolver returns an entry for the requested rate with the
    /// smallest possible MCLK distance.
    #[test]
    fn resolve_picks_nearest_mclk(refclk in 1_000_000u32..50_000_000, idx in 0usize..RATES.len()) {
        let rate = RATES[idx];
        let entry = resolve(refclk, rate).unwrap();
        prop_assert_eq!(entry.rate_hz, rate);
        let best = CLOCK_TABLE
            .iter()
            .filter(|e| e.rate_hz == rate)
            .map(|e| refclk.abs_diff(e.mclk_hz))
            .min()
            .unwrap();
        prop_assert_eq!(refclk.abs_diff(entry.mclk_hz), best);
    }

    /// Rates missing from the table are always rejected.
    #[test]
    fn resolve_rejects_unlisted_rates(refclk in any::<u32>(), rate in any::<u32>()) {
        prop_assume!(!RATES.contains(&rate));
        prop_assert_eq!(resolve(refclk, rate), Err(Error::UnsupportedRate { rate }));
    }

    /// Every level inside a control's user range reads back unchanged and
    /// leaves bits owned by nothing else untouched.
    #[test]
    fn control_levels_round_trip(
        idx in 0usize..CONTROLS.len(),
        left in any::<u32>(),
        right in any::<u32>(),
        background in proptest::collection::vec(any::<u8>(), REGISTER_COUNT),
    ) {
        let control = &CONTROLS[idx];
        let range = control.info().max;
        let (left, right) = (left % (range + 1), right % (range + 1));

        let mut registers = [0u8; REGISTER_COUNT];
        registers.copy_from_slice(&background);
        let mut cache = RegisterCache::new(RamChip::new(registers));
        cache.bulk_sync().unwrap();
        let before = *cache.snapshot();

        control.put(&mut cache, left, Some(right)).unwrap();
        let (got_left, got_right) = control.get(&cache).unwrap();
        prop_assert_eq!(got_left, left);
        if let Some(got_right) = got_right {
            prop_assert_eq!(got_right, right);
        }

        // Bits outside the control's field never change, even in a shared
        // register.
        let after = cache.snapshot();
        let owned = owned_bits(control);
        for reg in 0..REGISTER_COUNT {
            prop_assert_eq!(
                after[reg] & !owned[reg],
                before[reg] & !owned[reg],
                "reg {:#x} changed outside {}", reg, control.name
            );
        }
    }

    /// Master volume: put then get is the identity over the full 0..=176 range.
    #[test]
    fn master_volume_identity(level in 0u32..=176) {
        let master = find("Master Playback Volume").unwrap();
        let mut cache = RegisterCache::new(RamChip::new(DEFAULTS));
        master.put(&mut cache, level, None).unwrap();
        prop_assert_eq!(master.get(&cache).unwrap(), (level, Some(level)));
    }
}
