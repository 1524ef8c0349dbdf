//! Register-level driver for the Bosch BMA400 accelerometer.
//!
//! ```rust,ignore
//! use bma400::{Bma400, params::{Oversampling, PowerMode}};
//!
//! let mut bma = Bma400::new_i2c(&mut i2c)?;
//! bma.set_oversampling(Oversampling::Osr2)?;
//! bma.set_power_mode(PowerMode::Normal)?;
//! let [x, y, z] = bma.read_accel_mg()?;
//! ```
#![cfg_attr(not(test), no_std)]

mod error;

pub mod config;
pub mod device;
pub mod interface;
mod log;
pub mod params;
pub mod registers;

pub use crate::device::Bma400;
pub use crate::error::{Error, Result};
