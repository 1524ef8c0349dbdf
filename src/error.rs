//! Error handling primitives for the BMA400 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The identity register did not hold the BMA400 chip id.
    DeviceNotFound,
    /// The requested code is not a member of the enumerated setting.
    InvalidSetting,
    /// The value does not fit in the width of the target bitfield.
    InvalidFieldValue,
    /// The device reported a reserved code for an enumerated setting.
    UnknownVariant(u8),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
