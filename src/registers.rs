//! Register map definitions for the BMA400 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    AccelRange, FilterBandwidth, LowPowerOversampling, OutputDataRate, Oversampling, PowerMode,
};

/// Default 7-bit I²C address (SDO pulled low).
pub const I2C_ADDRESS: u8 = 0x14;
/// Alternate 7-bit I²C address (SDO pulled high).
pub const I2C_ADDRESS_ALT: u8 = 0x15;

/// Register address of the identity register.
pub const REG_CHIP_ID: u8 = 0x90;
/// Register address of `ACC_X_LSB`.
pub const REG_ACC_X_LSB: u8 = 0x04;
/// Register address of `ACC_X_MSB`.
pub const REG_ACC_X_MSB: u8 = 0x05;
/// Register address of `ACC_Y_LSB`.
pub const REG_ACC_Y_LSB: u8 = 0x06;
/// Register address of `ACC_Y_MSB`.
pub const REG_ACC_Y_MSB: u8 = 0x07;
/// Register address of `ACC_Z_LSB`.
pub const REG_ACC_Z_LSB: u8 = 0x08;
/// Register address of `ACC_Z_MSB`.
pub const REG_ACC_Z_MSB: u8 = 0x09;
/// Register address of `ACC_CONFIG0`.
pub const REG_ACC_CONFIG0: u8 = 0x19;
/// Register address of `ACC_CONFIG1`.
pub const REG_ACC_CONFIG1: u8 = 0x1A;

/// Value the identity register holds on a genuine BMA400.
pub const EXPECTED_CHIP_ID: u8 = 0x90;

/// `ACC_CONFIG0[1:0]` power mode.
pub const FIELD_POWER_MODE: BitField = BitField::new(REG_ACC_CONFIG0, 0, 2);
/// `ACC_CONFIG0[6:5]` oversampling used in low-power mode.
pub const FIELD_OSR_LP: BitField = BitField::new(REG_ACC_CONFIG0, 5, 2);
/// `ACC_CONFIG0[7]` filter 1 bandwidth.
pub const FIELD_FILT1_BW: BitField = BitField::new(REG_ACC_CONFIG0, 7, 1);
/// `ACC_CONFIG1[3:0]` output data rate.
pub const FIELD_ACC_ODR: BitField = BitField::new(REG_ACC_CONFIG1, 0, 4);
/// `ACC_CONFIG1[5:4]` oversampling rate.
pub const FIELD_OSR: BitField = BitField::new(REG_ACC_CONFIG1, 4, 2);
/// `ACC_CONFIG1[7:6]` measurement range.
pub const FIELD_ACC_RANGE: BitField = BitField::new(REG_ACC_CONFIG1, 6, 2);

/// Location of a sub-byte field inside a single-byte register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    register: u8,
    offset: u8,
    width: u8,
}

impl BitField {
    /// Describes a field; fails const evaluation if it does not fit in a byte.
    ///
    /// # Panics
    ///
    /// When built at runtime with `width == 0` or `offset + width > 8`.
    pub const fn new(register: u8, offset: u8, width: u8) -> Self {
        assert!(
            offset < 8 && width > 0 && width <= 8 - offset,
            "bitfield exceeds register width"
        );
        Self {
            register,
            offset,
            width,
        }
    }

    /// Describes a whole register.
    pub const fn whole(register: u8) -> Self {
        Self::new(register, 0, 8)
    }

    /// Register holding the field.
    pub const fn register(self) -> u8 {
        self.register
    }

    /// Position of the least significant bit of the field.
    pub const fn offset(self) -> u8 {
        self.offset
    }

    /// Number of bits in the field.
    pub const fn width(self) -> u8 {
        self.width
    }

    /// Largest value the field can hold.
    pub const fn max_value(self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Field bits in register position.
    pub const fn mask(self) -> u8 {
        self.max_value() << self.offset
    }

    /// Extracts the field from a raw register byte.
    pub const fn extract(self, raw: u8) -> u8 {
        (raw >> self.offset) & self.max_value()
    }

    /// Replaces the field inside `raw`, leaving every other bit untouched.
    pub const fn insert(self, raw: u8, value: u8) -> u8 {
        (raw & !self.mask()) | ((value << self.offset) & self.mask())
    }
}

/// Enumerated configuration value stored in a [`BitField`].
pub trait Setting: Copy + PartialEq + 'static {
    /// Field backing the setting.
    const FIELD: BitField;
    /// Every valid variant, in ascending code order.
    const VARIANTS: &'static [Self];

    /// Bit pattern written to the field.
    fn bits(self) -> u8;

    /// Datasheet name of the variant.
    fn name(self) -> &'static str;

    /// Maps a raw field value back to its variant, if it is not reserved.
    fn from_bits(bits: u8) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|variant| variant.bits() == bits)
    }
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `ACC_CONFIG0` register (address `0x19`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccConfig0 {
    // Power mode selection (bits 1:0).
    pub power_mode: PowerMode,
    #[skip]
    __: B3,
    // Low-power oversampling (bits 6:5).
    pub osr_lp: LowPowerOversampling,
    // Filter 1 bandwidth (bit 7).
    pub filt1_bw: FilterBandwidth,
}

impl From<u8> for AccConfig0 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<AccConfig0> for u8 {
    fn from(value: AccConfig0) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACC_CONFIG1` register (address `0x1A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccConfig1 {
    // Output data rate (bits 3:0).
    pub odr: OutputDataRate,
    // Oversampling rate (bits 5:4).
    pub osr: Oversampling,
    // Measurement range (bits 7:6).
    pub range: AccelRange,
}

impl From<u8> for AccConfig1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<AccConfig1> for u8 {
    fn from(value: AccConfig1) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for AccConfig0 {
    type Raw = u8;
    const ADDRESS: u8 = REG_ACC_CONFIG0;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for AccConfig1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_ACC_CONFIG1;
    const RESET_VALUE: Option<Self::Raw> = Some(0x49);
}

/// Sign-extends a 12-bit two's complement sample split over two registers.
pub fn accel_sample(lsb: u8, msb: u8) -> i16 {
    let raw = (u16::from(msb & 0x0F) << 8) | u16::from(lsb);
    ((raw << 4) as i16) >> 4
}
