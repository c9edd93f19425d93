//! Logging facade
//!
//! Hardware builds log through defmt (level filtered by `DEFMT_LOG` at build
//! time), desktop builds through tracing. With neither feature enabled the
//! macros compile away but still type-check their arguments.
//!
//! Format strings are restricted to `{}` and `{:#x}` so they are valid for
//! both backends.

#[cfg(feature = "defmt")]
macro_rules! log_event {
    (trace, $($arg:tt)*) => { defmt::trace!($($arg)*) };
    (debug, $($arg:tt)*) => { defmt::debug!($($arg)*) };
    (info, $($arg:tt)*) => { defmt::info!($($arg)*) };
    (warn, $($arg:tt)*) => { defmt::warn!($($arg)*) };
    (error, $($arg:tt)*) => { defmt::error!($($arg)*) };
}

#[cfg(all(feature = "tracing", not(feature = "defmt")))]
macro_rules! log_event {
    (trace, $($arg:tt)*) => { tracing::trace!($($arg)*) };
    (debug, $($arg:tt)*) => { tracing::debug!($($arg)*) };
    (info, $($arg:tt)*) => { tracing::info!($($arg)*) };
    (warn, $($arg:tt)*) => { tracing::warn!($($arg)*) };
    (error, $($arg:tt)*) => { tracing::error!($($arg)*) };
}

#[cfg(not(any(feature = "defmt", feature = "tracing")))]
macro_rules! log_event {
    ($level:ident, $($arg:tt)*) => {{
        if false {
            let _ = core::format_args!($($arg)*);
        }
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => { log_event!(trace, $($arg)*) };
}

macro_rules! debug {
    ($($arg:tt)*) => { log_event!(debug, $($arg)*) };
}

macro_rules! info {
    ($($arg:tt)*) => { log_event!(info, $($arg)*) };
}

macro_rules! warn {
    ($($arg:tt)*) => { log_event!(warn, $($arg)*) };
}

macro_rules! error {
    ($($arg:tt)*) => { log_event!(error, $($arg)*) };
}
