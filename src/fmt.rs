//! Logging shims shared by the firmware and the host-testable library.
//!
//! With the `defmt` feature the macros forward to `defmt`; without it they
//! only type-check their arguments, so host tests need no logger.

#![allow(unused_macros)]

#[cfg(feature = "defmt")]
macro_rules! trace {
    ($($t:tt)*) => {{ defmt::trace!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! debug {
    ($($t:tt)*) => {{ defmt::debug!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! info {
    ($($t:tt)*) => {{ defmt::info!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! warn {
    ($($t:tt)*) => {{ defmt::warn!($($t)*); }};
}

#[cfg(feature = "defmt")]
macro_rules! error {
    ($($t:tt)*) => {{ defmt::error!($($t)*); }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($t:tt)*) => {{ format_args!($($t)*); }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($t:tt)*) => {{ format_args!($($t)*); }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($t:tt)*) => {{ format_args!($($t)*); }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($t:tt)*) => {{ format_args!($($t)*); }};
}

#[cfg(not(feature = "defmt"))]
macro_rules! error {
    ($($t:tt)*) => {{ format_args!($($t)*); }};
}
