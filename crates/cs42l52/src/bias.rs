//! Bias-level power state machine
//!
//! The audio framework moves the codec through four power levels. Only the
//! charge pump / codec power-down bits in PWRCTL1 and the mic power-down group
//! in PWRCTL2 change:
//!
//! | Level      | PWRCTL1                       | PWRCTL2        |
//! |------------|-------------------------------|----------------|
//! | `On`       | unchanged                     | unchanged      |
//! | `Prepare`  | clear PDN_CHRG and PDN_CODEC  | unchanged      |
//! | `Standby`  | clear PDN_CHRG and PDN_CODEC  | unchanged      |
//! | `Off`      | 0x9F (everything powered down)| set 0x07 group |
//!
//! Reserved bits 6:5 of PWRCTL1 and 7:3 of PWRCTL2 are written as zero.

use crate::cache::RegisterCache;
use crate::error::Result;
use crate::registers::{
    PWRCTL1_PDN_ALL, PWRCTL1_PDN_CHRG, PWRCTL1_PDN_CODEC, PWRCTL2_PDN_ALL, REG_PWRCTL1,
    REG_PWRCTL2,
};
use crate::transport::Transport;

/// Codec power level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiasLevel {
    /// Streaming.
    On,
    /// About to stream.
    Prepare,
    /// Idle with references powered.
    Standby,
    /// Fully powered down.
    Off,
}

/// Program the power-control registers for `level`.
pub fn apply<T: Transport>(cache: &mut RegisterCache<T>, level: BiasLevel) -> Result<()> {
    let pwrctl1 = cache.read(REG_PWRCTL1)? & PWRCTL1_PDN_ALL;
    let pwrctl2 = cache.read(REG_PWRCTL2)? & PWRCTL2_PDN_ALL;

    match level {
        BiasLevel::On => {}
        BiasLevel::Prepare | BiasLevel::Standby => {
            cache.write(REG_PWRCTL1, pwrctl1 & !(PWRCTL1_PDN_CHRG | PWRCTL1_PDN_CODEC))?;
        }
        BiasLevel::Off => {
            cache.write(REG_PWRCTL1, pwrctl1 | PWRCTL1_PDN_ALL)?;
            cache.write(REG_PWRCTL2, pwrctl2 | PWRCTL2_PDN_ALL)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[test]
    fn on_touches_nothing() {
        let mut cache = RegisterCache::new(MockTransport::new());
        apply(&mut cache, BiasLevel::On).unwrap();
        assert_eq!(cache.transport().transaction_count(), 0);
    }

    #[test]
    fn off_sets_both_groups() {
        let mut cache = RegisterCache::new(MockTransport::new());
        cache.write(REG_PWRCTL1, 0x00).unwrap();
        cache.write(REG_PWRCTL2, 0x00).unwrap();
        apply(&mut cache, BiasLevel::Off).unwrap();
        assert_eq!(cache.read(REG_PWRCTL1).unwrap(), 0x9F);
        assert_eq!(cache.read(REG_PWRCTL2).unwrap(), 0x07);
    }

    #[test]
    fn off_then_standby_clears_pwrctl1_only() {
        let mut cache = RegisterCache::new(MockTransport::new());
        apply(&mut cache, BiasLevel::Off).unwrap();
        cache.transport_mut().clear_log();

        apply(&mut cache, BiasLevel::Standby).unwrap();
        // PGA / ADC power-downs stay set; charge pump and codec come up.
        assert_eq!(cache.read(REG_PWRCTL1).unwrap(), 0x1E);
        assert_eq!(cache.read(REG_PWRCTL2).unwrap(), 0x07);
        assert_eq!(cache.transport().writes, std::vec![std::vec![0x02, 0x1E]]);
    }

    #[test]
    fn prepare_matches_standby() {
        let mut a = RegisterCache::new(MockTransport::new());
        let mut b = RegisterCache::new(MockTransport::new());
        apply(&mut a, BiasLevel::Prepare).unwrap();
        apply(&mut b, BiasLevel::Standby).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn reserved_bits_are_dropped() {
        let mut cache = RegisterCache::new(MockTransport::new());
        cache.write(REG_PWRCTL1, 0xFF).unwrap();
        apply(&mut cache, BiasLevel::Standby).unwrap();
        assert_eq!(cache.read(REG_PWRCTL1).unwrap(), 0x1E);
    }
}
