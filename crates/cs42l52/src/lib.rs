//! Control core for the Cirrus Logic CS42L52 stereo codec
//!
//! This crate owns the host-side view of the chip: a shadow copy of every
//! register, the clock divider selection for a given reference clock and
//! sample rate, and the mixer controls that scale user levels into register
//! bitfields.
//!
//! # Architecture Layers
//!
//! ```text
//! Audio framework / machine glue (machine)
//!         ↓
//! Codec driver (codec) ── mixer controls (controls), bias (bias), DAI (dai)
//!         ↓                       ↓
//! Register cache (cache) ←── clock resolver (clock)
//!         ↓
//! Transport (transport) ── I2C via embedded-hal
//! ```
//!
//! # Features
//!
//! - `std`: expose [`mock::MockTransport`] outside of unit tests
//! - `defmt`: log through defmt and derive `defmt::Format` on public types
//! - `tracing`: log through tracing (desktop builds)
//!
//! # Example
//!
//! ```no_run
//! use cs42l52::{CodecConfig, Cs42l52, I2cTransport};
//!
//! fn bring_up<I: embedded_hal::i2c::I2c>(i2c: I) -> cs42l52::Result<()> {
//!     let config = CodecConfig::default();
//!     let transport = I2cTransport::new(i2c, config.i2c_address);
//!     let mut codec = Cs42l52::attach(transport, config)?;
//!     codec.hw_params(48_000)?;
//!     codec.control_put("Master Playback Volume", 150, Some(150))?;
//!     Ok(())
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this register-level driver crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // register accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod log;

pub mod bias;
pub mod cache;
pub mod clock;
pub mod codec;
pub mod config;
pub mod controls;
pub mod dai;
pub mod error;
pub mod machine;
pub mod registers;
pub mod transport;

#[cfg(any(test, feature = "std"))]
pub mod mock;

pub use bias::BiasLevel;
pub use cache::RegisterCache;
pub use clock::{resolve, ClockTableEntry, CLOCK_TABLE};
pub use codec::Cs42l52;
pub use config::{ClockMode, CodecConfig};
pub use controls::{ControlInfo, ControlKind, ControlType, MixerControl, CONTROLS};
pub use dai::{ClockInversion, ClockRole, DaiFormat, Framing};
pub use error::{Error, Result};
pub use machine::BoardLink;
pub use registers::REGISTER_COUNT;
pub use transport::{I2cTransport, Transport};
