//! Logging shims.
//!
//! With the `defmt` feature the macros forward to `defmt`; without it they
//! expand to nothing so driver code can log unconditionally.

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, trace};

#[cfg(not(feature = "defmt"))]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
pub(crate) use {debug, trace};
