//! High-level BMA400 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::i2c::I2cInterface;
use crate::interface::Bma400Interface;
use crate::log::{debug, trace};
use crate::params::{
    AccelRange,
    FilterBandwidth,
    LowPowerOversampling,
    OutputDataRate,
    Oversampling,
    PowerMode,
};
use crate::registers::{
    accel_sample,
    AccConfig0,
    AccConfig1,
    BitField,
    Register,
    Setting,
    EXPECTED_CHIP_ID,
    I2C_ADDRESS,
    REG_ACC_X_LSB,
    REG_ACC_X_MSB,
    REG_ACC_Y_LSB,
    REG_ACC_Y_MSB,
    REG_ACC_Z_LSB,
    REG_ACC_Z_MSB,
    REG_CHIP_ID,
};
use embedded_hal::i2c::I2c;

// LSB/MSB register pairs for the X, Y and Z axes.
const AXIS_REGISTERS: [(u8, u8); 3] = [
    (REG_ACC_X_LSB, REG_ACC_X_MSB),
    (REG_ACC_Y_LSB, REG_ACC_Y_MSB),
    (REG_ACC_Z_LSB, REG_ACC_Z_MSB),
];

/// High-level synchronous driver for the BMA400 accelerometer.
///
/// Every accessor performs blocking bus transactions and returns before the
/// caller proceeds. Bus errors are returned as [`Error::Interface`] without
/// retries.
pub struct Bma400<IFACE> {
    interface: IFACE,
    address: u8,
}

impl<IFACE> Bma400<IFACE> {
    // ==================================================================
    // == Driver Ownership ==============================================
    // ==================================================================
    /// Returns the 7-bit device address used for every transaction.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }
}

impl<I2C> Bma400<I2cInterface<I2C>>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I²C transports at the default address (`0x14`).
    pub fn new_i2c(i2c: I2C) -> Result<Self, I2C::Error> {
        Self::new_i2c_with_address(i2c, I2C_ADDRESS)
    }

    /// Convenience constructor for I²C transports at a custom address.
    pub fn new_i2c_with_address(i2c: I2C, address: u8) -> Result<Self, I2C::Error> {
        Self::new(I2cInterface::new(i2c), address)
    }

    /// Releases the driver, returning the I²C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<IFACE, CommE> Bma400<IFACE>
where
    IFACE: Bma400Interface<Error = CommE>,
{
    // ==================================================================
    // == Construction & Identification =================================
    // ==================================================================
    /// Creates a driver after confirming a BMA400 answers at `address`.
    ///
    /// Issues exactly one read of the identity register. Any other value
    /// than the BMA400 chip id fails with [`Error::DeviceNotFound`] and no
    /// driver is produced.
    pub fn new(interface: IFACE, address: u8) -> Result<Self, CommE> {
        let mut device = Self { interface, address };

        let id = device.read_register(REG_CHIP_ID)?;
        if id != EXPECTED_CHIP_ID {
            return Err(Error::DeviceNotFound);
        }

        debug!("BMA400 found at {=u8:#x}", address);
        Ok(device)
    }

    /// Reads the identity register.
    pub fn chip_id(&mut self) -> Result<u8, CommE> {
        self.read_register(REG_CHIP_ID)
    }

    // ==================================================================
    // == Register & Bitfield Access ====================================
    // ==================================================================
    /// Reads a whole register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        self.read_bits(BitField::whole(register))
    }

    /// Writes a whole register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.interface
            .write_register(self.address, register, value)
            .map_err(Error::from)?;
        trace!("write {=u8:#x} <- {=u8:#x}", register, value);
        Ok(())
    }

    /// Reads the value of `field`, right-aligned.
    pub fn read_bits(&mut self, field: BitField) -> Result<u8, CommE> {
        let raw = self
            .interface
            .read_register(self.address, field.register())
            .map_err(Error::from)?;
        trace!("read {=u8:#x} -> {=u8:#x}", field.register(), raw);
        Ok(field.extract(raw))
    }

    /// Replaces the value of `field` with a read-modify-write of its register.
    ///
    /// Values wider than the field are rejected with
    /// [`Error::InvalidFieldValue`] before any bus access.
    pub fn write_bits(&mut self, field: BitField, value: u8) -> Result<(), CommE> {
        if value > field.max_value() {
            return Err(Error::InvalidFieldValue);
        }

        let current = self.read_register(field.register())?;
        self.write_register(field.register(), field.insert(current, value))
    }

    // ==================================================================
    // == Enumerated Settings ===========================================
    // ==================================================================
    /// Reads an enumerated setting.
    ///
    /// Reserved codes are reported as [`Error::UnknownVariant`].
    pub fn setting<S: Setting>(&mut self) -> Result<S, CommE> {
        let bits = self.read_bits(S::FIELD)?;
        S::from_bits(bits).ok_or(Error::UnknownVariant(bits))
    }

    /// Writes an enumerated setting.
    pub fn set_setting<S: Setting>(&mut self, value: S) -> Result<(), CommE> {
        self.write_bits(S::FIELD, value.bits())
    }

    /// Writes an enumerated setting given as a raw code.
    ///
    /// Codes outside `S::VARIANTS` fail with [`Error::InvalidSetting`]
    /// without touching the bus.
    pub fn set_setting_bits<S: Setting>(&mut self, bits: u8) -> Result<(), CommE> {
        let value = S::from_bits(bits).ok_or(Error::InvalidSetting)?;
        self.set_setting(value)
    }

    /// Returns the current power mode.
    pub fn power_mode(&mut self) -> Result<PowerMode, CommE> {
        self.setting()
    }

    /// Sets the power mode. Transition sequencing is left to the caller.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), CommE> {
        self.set_setting(mode)
    }

    /// Returns the normal-mode oversampling rate.
    pub fn oversampling(&mut self) -> Result<Oversampling, CommE> {
        self.setting()
    }

    /// Sets the normal-mode oversampling rate.
    pub fn set_oversampling(&mut self, oversampling: Oversampling) -> Result<(), CommE> {
        self.set_setting(oversampling)
    }

    /// Returns the low-power-mode oversampling rate.
    pub fn low_power_oversampling(&mut self) -> Result<LowPowerOversampling, CommE> {
        self.setting()
    }

    /// Sets the low-power-mode oversampling rate.
    pub fn set_low_power_oversampling(
        &mut self,
        oversampling: LowPowerOversampling,
    ) -> Result<(), CommE> {
        self.set_setting(oversampling)
    }

    /// Returns the output data rate.
    pub fn output_data_rate(&mut self) -> Result<OutputDataRate, CommE> {
        self.setting()
    }

    /// Sets the output data rate.
    pub fn set_output_data_rate(&mut self, odr: OutputDataRate) -> Result<(), CommE> {
        self.set_setting(odr)
    }

    /// Returns the measurement range.
    pub fn accel_range(&mut self) -> Result<AccelRange, CommE> {
        self.setting()
    }

    /// Sets the measurement range.
    pub fn set_accel_range(&mut self, range: AccelRange) -> Result<(), CommE> {
        self.set_setting(range)
    }

    /// Returns the filter 1 bandwidth.
    pub fn filter_bandwidth(&mut self) -> Result<FilterBandwidth, CommE> {
        self.setting()
    }

    /// Sets the filter 1 bandwidth.
    pub fn set_filter_bandwidth(&mut self, bandwidth: FilterBandwidth) -> Result<(), CommE> {
        self.set_setting(bandwidth)
    }

    // ==================================================================
    // == Global Configuration ==========================================
    // ==================================================================
    /// Applies every field of `config` in one update per register.
    ///
    /// Reserved bits are preserved and unchanged registers are not rewritten.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        // ACC_CONFIG1 first so the power mode change sees the new rate and range.
        self.update_register::<AccConfig1, _>(|reg| {
            reg.set_odr(config.odr);
            reg.set_osr(config.oversampling);
            reg.set_range(config.range);
        })?;
        self.update_register::<AccConfig0, _>(|reg| {
            reg.set_power_mode(config.power_mode);
            reg.set_osr_lp(config.low_power_oversampling);
            reg.set_filt1_bw(config.filter_bandwidth);
        })?;
        Ok(())
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads a raw 12-bit acceleration triplet.
    ///
    /// Each axis reads its LSB first, which latches the matching MSB.
    pub fn read_accel_raw(&mut self) -> Result<[i16; 3], CommE> {
        let mut sample = [0i16; 3];
        for (axis, (lsb_reg, msb_reg)) in sample.iter_mut().zip(AXIS_REGISTERS) {
            let lsb = self.read_register(lsb_reg)?;
            let msb = self.read_register(msb_reg)?;
            *axis = accel_sample(lsb, msb);
        }
        Ok(sample)
    }

    /// Returns acceleration scaled in milli-g for the configured range.
    pub fn read_accel_mg(&mut self) -> Result<[i32; 3], CommE> {
        let range = self.accel_range()?;
        let [x, y, z] = self.read_accel_raw()?;
        Ok([range.to_mg(x), range.to_mg(y), range.to_mg(z)])
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn update_register<R, F>(&mut self, mut mutate: F) -> Result<R, CommE>
    where
        R: Register<Raw = u8> + From<u8> + Into<u8> + Copy,
        F: FnMut(&mut R),
    {
        let current = self.read_register(R::ADDRESS)?;

        let mut reg = R::from(current);
        mutate(&mut reg);

        let updated: u8 = reg.into();
        if updated != current {
            self.write_register(R::ADDRESS, updated)?;
        }

        Ok(reg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{REG_ACC_CONFIG0, REG_ACC_CONFIG1};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const ADDR: u8 = I2C_ADDRESS;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BusFault;

    /// In-memory register file that counts transactions.
    struct FakeBus {
        registers: [u8; 256],
        reads: usize,
        writes: usize,
        fail: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            let mut registers = [0u8; 256];
            registers[REG_CHIP_ID as usize] = EXPECTED_CHIP_ID;
            Self {
                registers,
                reads: 0,
                writes: 0,
                fail: false,
            }
        }

        fn transactions(&self) -> usize {
            self.reads + self.writes
        }
    }

    impl Bma400Interface for &mut FakeBus {
        type Error = BusFault;

        fn read_register(&mut self, address: u8, register: u8) -> core::result::Result<u8, BusFault> {
            assert_eq!(address, ADDR);
            if self.fail {
                return Err(BusFault);
            }
            self.reads += 1;
            Ok(self.registers[register as usize])
        }

        fn write_register(
            &mut self,
            address: u8,
            register: u8,
            value: u8,
        ) -> core::result::Result<(), BusFault> {
            assert_eq!(address, ADDR);
            if self.fail {
                return Err(BusFault);
            }
            self.writes += 1;
            self.registers[register as usize] = value;
            Ok(())
        }
    }

    #[test]
    fn construction_checks_identity_once() {
        let mut bus = FakeBus::new();
        let device = Bma400::new(&mut bus, ADDR).unwrap();
        assert_eq!(device.address(), ADDR);
        drop(device);
        assert_eq!(bus.reads, 1);
        assert_eq!(bus.writes, 0);
    }

    #[test]
    fn chip_id_rereads_identity_register() {
        let mut bus = FakeBus::new();
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        assert_eq!(device.chip_id().unwrap(), EXPECTED_CHIP_ID);
        drop(device);
        assert_eq!((bus.reads, bus.writes), (2, 0));
    }

    #[test]
    fn chip_id_over_i2c() {
        let expectations = [
            I2cTrans::write_read(ADDR, vec![REG_CHIP_ID], vec![EXPECTED_CHIP_ID]),
            I2cTrans::write_read(ADDR, vec![REG_CHIP_ID], vec![EXPECTED_CHIP_ID]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Bma400::new_i2c(&mut i2c).unwrap();
        assert_eq!(device.chip_id().unwrap(), 0x90);

        device.release_i2c();
        i2c.done();
    }

    #[test]
    fn construction_rejects_every_other_identity() {
        for id in (0u8..=255).filter(|&id| id != EXPECTED_CHIP_ID) {
            let mut bus = FakeBus::new();
            bus.registers[REG_CHIP_ID as usize] = id;
            assert!(matches!(Bma400::new(&mut bus, ADDR), Err(Error::DeviceNotFound)));
            assert_eq!(bus.transactions(), 1);
        }
    }

    #[test]
    fn construction_propagates_bus_errors() {
        let mut bus = FakeBus::new();
        bus.fail = true;
        assert!(matches!(Bma400::new(&mut bus, ADDR), Err(Error::Interface(BusFault))));
    }

    #[test]
    fn power_mode_round_trips_and_preserves_upper_bits() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG0 as usize] = 0b1110_0000;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();

        for &mode in PowerMode::VARIANTS {
            device.set_power_mode(mode).unwrap();
            assert_eq!(device.power_mode().unwrap(), mode);
        }
        drop(device);
        assert_eq!(bus.registers[REG_ACC_CONFIG0 as usize], 0b1110_0011);
    }

    #[test]
    fn setter_issues_one_read_and_one_write() {
        let mut bus = FakeBus::new();
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        device.set_power_mode(PowerMode::Sleep).unwrap();
        drop(device);
        assert_eq!((bus.reads, bus.writes), (2, 1));
    }

    #[test]
    fn invalid_power_mode_codes_never_touch_the_bus() {
        let mut bus = FakeBus::new();
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        for code in 4u8..=255 {
            assert_eq!(
                device.set_setting_bits::<PowerMode>(code),
                Err(Error::InvalidSetting)
            );
        }
        device.set_setting_bits::<PowerMode>(0b01).unwrap();
        assert_eq!(device.power_mode().unwrap(), PowerMode::LowPower);
        drop(device);
        assert_eq!(bus.transactions(), 1 + 2 + 1);
    }

    #[test]
    fn oversized_field_values_never_touch_the_bus() {
        let mut bus = FakeBus::new();
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        let field = BitField::new(REG_ACC_CONFIG0, 0, 2);
        assert_eq!(device.write_bits(field, 4), Err(Error::InvalidFieldValue));
        drop(device);
        assert_eq!(bus.transactions(), 1);
    }

    #[test]
    fn write_bits_preserves_unrelated_bits() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG0 as usize] = 0b1101_0101;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        device.write_bits(BitField::new(REG_ACC_CONFIG0, 0, 2), 0b10).unwrap();
        drop(device);
        assert_eq!(bus.registers[REG_ACC_CONFIG0 as usize], 0b1101_0110);
    }

    #[test]
    fn reserved_codes_surface_as_unknown_variant() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG1 as usize] = 0b0100_0011;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        assert_eq!(device.output_data_rate(), Err(Error::UnknownVariant(0x03)));
        assert_eq!(device.accel_range().unwrap(), AccelRange::G4);
    }

    #[test]
    fn acc_config1_settings_share_the_register() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG1 as usize] = 0x49;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();

        device.set_oversampling(Oversampling::Osr2).unwrap();
        device.set_accel_range(AccelRange::G16).unwrap();
        device.set_output_data_rate(OutputDataRate::Hz12_5).unwrap();

        assert_eq!(device.oversampling().unwrap(), Oversampling::Osr2);
        assert_eq!(device.accel_range().unwrap(), AccelRange::G16);
        assert_eq!(device.output_data_rate().unwrap(), OutputDataRate::Hz12_5);
        drop(device);
        assert_eq!(bus.registers[REG_ACC_CONFIG1 as usize], 0b11_10_0101);
    }

    #[test]
    fn configure_writes_both_registers_and_keeps_reserved_bits() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG0 as usize] = 0b0001_1100;
        bus.registers[REG_ACC_CONFIG1 as usize] = 0x49;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();

        let config = Config::new()
            .power_mode(PowerMode::Normal)
            .odr(OutputDataRate::Hz100)
            .oversampling(Oversampling::Osr3)
            .low_power_oversampling(LowPowerOversampling::Osr1)
            .range(AccelRange::G2)
            .filter_bandwidth(FilterBandwidth::Low)
            .build();
        device.configure(config).unwrap();

        assert_eq!(device.filter_bandwidth().unwrap(), FilterBandwidth::Low);
        assert_eq!(device.low_power_oversampling().unwrap(), LowPowerOversampling::Osr1);
        drop(device);
        assert_eq!(bus.registers[REG_ACC_CONFIG0 as usize], 0b1011_1110);
        assert_eq!(bus.registers[REG_ACC_CONFIG1 as usize], 0b00_11_1000);
    }

    #[test]
    fn configure_skips_unchanged_registers() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG1 as usize] = 0x49;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();
        device.configure(Config::default()).unwrap();
        drop(device);
        assert_eq!((bus.reads, bus.writes), (3, 0));
    }

    #[test]
    fn acceleration_is_scaled_by_range() {
        let mut bus = FakeBus::new();
        bus.registers[REG_ACC_CONFIG1 as usize] = 0b00_00_1000;
        bus.registers[REG_ACC_X_LSB as usize] = 0x00;
        bus.registers[REG_ACC_X_MSB as usize] = 0x04;
        bus.registers[REG_ACC_Y_LSB as usize] = 0x00;
        bus.registers[REG_ACC_Y_MSB as usize] = 0x0C;
        bus.registers[REG_ACC_Z_LSB as usize] = 0x01;
        bus.registers[REG_ACC_Z_MSB as usize] = 0x00;
        let mut device = Bma400::new(&mut bus, ADDR).unwrap();

        assert_eq!(device.read_accel_raw().unwrap(), [1_024, -1_024, 1]);
        assert_eq!(device.read_accel_mg().unwrap(), [1_000, -1_000, 0]);
    }

    #[test]
    fn i2c_power_mode_scenario() {
        let expectations = [
            I2cTrans::write_read(ADDR, vec![REG_CHIP_ID], vec![EXPECTED_CHIP_ID]),
            I2cTrans::write_read(ADDR, vec![REG_ACC_CONFIG0], vec![0b0000_0010]),
            I2cTrans::write_read(ADDR, vec![REG_ACC_CONFIG0], vec![0b1110_0010]),
            I2cTrans::write(ADDR, vec![REG_ACC_CONFIG0, 0b1110_0000]),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Bma400::new_i2c(&mut i2c).unwrap();
        let mode = device.power_mode().unwrap();
        assert_eq!(mode, PowerMode::Normal);
        assert_eq!(mode.name(), "NORMAL_MODE");
        device.set_power_mode(PowerMode::Sleep).unwrap();

        device.release_i2c();
        i2c.done();
    }

    #[test]
    fn i2c_alternate_address_and_missing_device() {
        let expectations = [I2cTrans::write_read(0x15, vec![REG_CHIP_ID], vec![0x00])];
        let mut i2c = I2cMock::new(&expectations);

        assert!(matches!(
            Bma400::new_i2c_with_address(&mut i2c, 0x15),
            Err(Error::DeviceNotFound)
        ));
        i2c.done();
    }

    #[test]
    fn i2c_write_failure_is_propagated() {
        let expectations = [
            I2cTrans::write_read(ADDR, vec![REG_CHIP_ID], vec![EXPECTED_CHIP_ID]),
            I2cTrans::write_read(ADDR, vec![REG_ACC_CONFIG1], vec![0x49]),
            I2cTrans::write(ADDR, vec![REG_ACC_CONFIG1, 0x69]).with_error(ErrorKind::Other),
        ];
        let mut i2c = I2cMock::new(&expectations);

        let mut device = Bma400::new_i2c(&mut i2c).unwrap();
        assert_eq!(
            device.set_oversampling(Oversampling::Osr2),
            Err(Error::Interface(ErrorKind::Other))
        );

        device.release_i2c();
        i2c.done();
    }
}
