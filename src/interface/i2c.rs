//! I²C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::I2c;

use super::Bma400Interface;

/// I²C-based interface implementation for the BMA400 driver.
///
/// `I2C` may be a borrowed bus (`&mut I2C`) or a shared-bus device so the
/// caller keeps ownership of the peripheral.
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface from the provided I²C bus abstraction.
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Consumes the interface and returns the owned I²C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Bma400Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn read_register(&mut self, address: u8, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.i2c.write_read(address, &[register], &mut value)?;
        Ok(value[0])
    }

    fn write_register(
        &mut self,
        address: u8,
        register: u8,
        value: u8,
    ) -> core::result::Result<(), Self::Error> {
        self.i2c.write(address, &[register, value])
    }
}
