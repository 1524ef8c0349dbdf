//! Bus interface abstraction for the BMA400 driver.

pub mod i2c;

/// Byte-level register access at a 7-bit device address.
///
/// This is the whole capability the driver consumes from the transport.
/// Implementations serialize their own bus access; the driver performs no
/// locking, retries, or timeouts.
pub trait Bma400Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads a single register.
    fn read_register(&mut self, address: u8, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Writes a single register.
    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        value: u8,
    ) -> core::result::Result<(), Self::Error>;
}
