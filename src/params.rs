//! Strongly typed parameter enumerations for the BMA400 driver.
//!
//! Every enum maps directly to a datasheet field encoding and implements
//! [`Setting`], which ties it to the [`BitField`](crate::registers::BitField)
//! storing it and to an explicit table of valid codes.
//!
//! # Examples
//!
//! ```rust
//! use bma400::params::{Oversampling, PowerMode};
//! use bma400::registers::Setting;
//!
//! assert_eq!(PowerMode::from_bits(0b10), Some(PowerMode::Normal));
//! assert_eq!(Oversampling::VARIANTS.len(), 4);
//! assert_eq!(Oversampling::Osr2.name(), "OVERSAMPLING_2");
//! ```

use modular_bitfield::prelude::Specifier;

use crate::registers::{
    BitField, Setting, FIELD_ACC_ODR, FIELD_ACC_RANGE, FIELD_FILT1_BW, FIELD_OSR, FIELD_OSR_LP,
    FIELD_POWER_MODE,
};

/// Operating power modes encoded in `ACC_CONFIG0[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum PowerMode {
    /// Sleep mode, no measurements.
    Sleep = 0b00,
    /// Low-power mode with a fixed 25 Hz data rate.
    LowPower = 0b01,
    /// Normal measurement mode.
    Normal = 0b10,
    /// Automatic return to sleep.
    SwitchToSleep = 0b11,
}

impl Setting for PowerMode {
    const FIELD: BitField = FIELD_POWER_MODE;
    const VARIANTS: &'static [Self] = &[
        Self::Sleep,
        Self::LowPower,
        Self::Normal,
        Self::SwitchToSleep,
    ];

    fn bits(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::Sleep => "SLEEP_MODE",
            Self::LowPower => "LOW_POWER_MODE",
            Self::Normal => "NORMAL_MODE",
            Self::SwitchToSleep => "SWITCH_TO_SLEEP",
        }
    }
}

/// Oversampling rate used in normal mode, `ACC_CONFIG1[5:4]`.
///
/// Higher rates trade current consumption for lower noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Oversampling {
    /// Lowest power, highest noise.
    Osr0 = 0b00,
    /// Oversampling rate 1.
    Osr1 = 0b01,
    /// Oversampling rate 2.
    Osr2 = 0b10,
    /// Highest power, lowest noise.
    Osr3 = 0b11,
}

impl Setting for Oversampling {
    const FIELD: BitField = FIELD_OSR;
    const VARIANTS: &'static [Self] = &[Self::Osr0, Self::Osr1, Self::Osr2, Self::Osr3];

    fn bits(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::Osr0 => "OVERSAMPLING_0",
            Self::Osr1 => "OVERSAMPLING_1",
            Self::Osr2 => "OVERSAMPLING_2",
            Self::Osr3 => "OVERSAMPLING_3",
        }
    }
}

/// Oversampling rate used in low-power mode, `ACC_CONFIG0[6:5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum LowPowerOversampling {
    /// Oversampling rate 0.
    Osr0 = 0b00,
    /// Oversampling rate 1.
    Osr1 = 0b01,
    /// Oversampling rate 2.
    Osr2 = 0b10,
    /// Oversampling rate 3.
    Osr3 = 0b11,
}

impl Setting for LowPowerOversampling {
    const FIELD: BitField = FIELD_OSR_LP;
    const VARIANTS: &'static [Self] = &[Self::Osr0, Self::Osr1, Self::Osr2, Self::Osr3];

    fn bits(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::Osr0 => "OVERSAMPLING_LP_0",
            Self::Osr1 => "OVERSAMPLING_LP_1",
            Self::Osr2 => "OVERSAMPLING_LP_2",
            Self::Osr3 => "OVERSAMPLING_LP_3",
        }
    }
}

/// Output data rate selections encoded in `ACC_CONFIG1[3:0]`.
///
/// Codes below `0x05` and above `0x0B` are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum OutputDataRate {
    /// 12.5 Hz.
    Hz12_5 = 0x05,
    /// 25 Hz.
    Hz25 = 0x06,
    /// 50 Hz.
    Hz50 = 0x07,
    /// 100 Hz.
    Hz100 = 0x08,
    /// 200 Hz.
    Hz200 = 0x09,
    /// 400 Hz.
    Hz400 = 0x0A,
    /// 800 Hz.
    Hz800 = 0x0B,
}

impl OutputDataRate {
    /// Returns the ODR in millihertz.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Hz12_5 => 12_500,
            Self::Hz25 => 25_000,
            Self::Hz50 => 50_000,
            Self::Hz100 => 100_000,
            Self::Hz200 => 200_000,
            Self::Hz400 => 400_000,
            Self::Hz800 => 800_000,
        }
    }
}

impl Setting for OutputDataRate {
    const FIELD: BitField = FIELD_ACC_ODR;
    const VARIANTS: &'static [Self] = &[
        Self::Hz12_5,
        Self::Hz25,
        Self::Hz50,
        Self::Hz100,
        Self::Hz200,
        Self::Hz400,
        Self::Hz800,
    ];

    fn bits(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::Hz12_5 => "ACCEL_12_5HZ",
            Self::Hz25 => "ACCEL_25HZ",
            Self::Hz50 => "ACCEL_50HZ",
            Self::Hz100 => "ACCEL_100HZ",
            Self::Hz200 => "ACCEL_200HZ",
            Self::Hz400 => "ACCEL_400HZ",
            Self::Hz800 => "ACCEL_800HZ",
        }
    }
}

/// Measurement range encoded in `ACC_CONFIG1[7:6]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum AccelRange {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl AccelRange {
    /// Returns the full-scale range in g.
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Converts a 12-bit sample to milli-g for this range.
    pub const fn to_mg(self, raw: i16) -> i32 {
        // 2048 counts span the positive half of the range.
        raw as i32 * self.g() as i32 * 1_000 / 2_048
    }
}

impl Setting for AccelRange {
    const FIELD: BitField = FIELD_ACC_RANGE;
    const VARIANTS: &'static [Self] = &[Self::G2, Self::G4, Self::G8, Self::G16];

    fn bits(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::G2 => "ACC_RANGE_2",
            Self::G4 => "ACC_RANGE_4",
            Self::G8 => "ACC_RANGE_8",
            Self::G16 => "ACC_RANGE_16",
        }
    }
}

/// Filter 1 bandwidth bit (`ACC_CONFIG0.FILT1_BW`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum FilterBandwidth {
    /// 0.48 × ODR.
    High = 0,
    /// 0.24 × ODR.
    Low = 1,
}

impl Setting for FilterBandwidth {
    const FIELD: BitField = FIELD_FILT1_BW;
    const VARIANTS: &'static [Self] = &[Self::High, Self::Low];

    fn bits(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            Self::High => "ACC_FILT_BW0",
            Self::Low => "ACC_FILT_BW1",
        }
    }
}
