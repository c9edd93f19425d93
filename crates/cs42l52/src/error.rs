//! Codec error type

use thiserror_no_std::Error;

/// Errors returned by every fallible codec operation.
///
/// None of these are fatal: the caller may retry or abandon the requested
/// change. A transport failure during a write leaves the cache holding the
/// new value while the chip may still hold the old one; a later
/// [`RegisterCache::bulk_sync`](crate::RegisterCache::bulk_sync) restores
/// agreement.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Register index outside the cache.
    #[error("register {reg:#x} is outside the register map")]
    OutOfRange {
        /// Offending register index.
        reg: u8,
    },

    /// A mixer control places its field beyond bit 7 of its register.
    #[error("field at bit {shift} does not fit register {reg:#x}")]
    InvalidField {
        /// Register the field belongs to.
        reg: u8,
        /// Requested bit position.
        shift: u8,
    },

    /// A register write did not move exactly two bytes over the bus.
    #[error("write to register {reg:#x} moved {written} of 2 bytes")]
    TransportWrite {
        /// Register that was being written.
        reg: u8,
        /// Bytes the transport reported as written.
        written: usize,
    },

    /// A block read returned a different number of bytes than requested.
    #[error("register read returned {got} of {expected} bytes")]
    TransportRead {
        /// Bytes requested.
        expected: usize,
        /// Bytes actually returned.
        got: usize,
    },

    /// No clock table entry exists for the requested sample rate.
    #[error("sample rate {rate} Hz is not supported")]
    UnsupportedRate {
        /// Requested sample rate in Hz.
        rate: u32,
    },

    /// The requested digital audio interface format cannot be programmed.
    #[error("unsupported digital audio interface format")]
    InvalidFormat,

    /// Reference clock outside the chip's accepted input range.
    #[error("reference clock {hz} Hz is outside the supported range")]
    InvalidClock {
        /// Requested reference clock in Hz.
        hz: u32,
    },

    /// The chip-ID register did not identify a CS42L52.
    #[error("unexpected chip id {id:#x}")]
    UnknownDevice {
        /// Raw chip-ID register value.
        id: u8,
    },

    /// No mixer control with the given name exists.
    #[error("no such mixer control")]
    UnknownControl,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_register() {
        let msg = std::format!("{}", Error::OutOfRange { reg: 0x40 });
        assert!(msg.contains("0x40"), "got {msg}");
    }

    #[test]
    fn display_reports_short_write() {
        let msg = std::format!("{}", Error::TransportWrite { reg: 0x05, written: 1 });
        assert!(msg.contains("1 of 2"), "got {msg}");
    }

    #[test]
    fn display_reports_field_position() {
        let msg = std::format!("{}", Error::InvalidField { reg: 0x1F, shift: 9 });
        assert!(msg.contains("bit 9") && msg.contains("0x1f"), "got {msg}");
    }
}
