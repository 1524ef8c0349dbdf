//! Configuration primitives for the BMA400 driver.

use crate::params::{
    AccelRange,
    FilterBandwidth,
    LowPowerOversampling,
    OutputDataRate,
    Oversampling,
    PowerMode,
};

/// User-facing configuration for the BMA400 sensor.
///
/// [`Config::default()`] mirrors the datasheet reset state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Operating power mode.
    pub power_mode: PowerMode,
    /// Output data rate used in normal mode.
    pub odr: OutputDataRate,
    /// Normal-mode oversampling rate.
    pub oversampling: Oversampling,
    /// Low-power-mode oversampling rate.
    pub low_power_oversampling: LowPowerOversampling,
    /// Measurement range.
    pub range: AccelRange,
    /// Filter 1 bandwidth.
    pub filter_bandwidth: FilterBandwidth,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the power mode.
    pub fn power_mode(mut self, power_mode: PowerMode) -> Self {
        self.config.power_mode = power_mode;
        self
    }

    /// Overrides the output data rate.
    pub fn odr(mut self, odr: OutputDataRate) -> Self {
        self.config.odr = odr;
        self
    }

    /// Overrides the normal-mode oversampling rate.
    pub fn oversampling(mut self, oversampling: Oversampling) -> Self {
        self.config.oversampling = oversampling;
        self
    }

    /// Overrides the low-power-mode oversampling rate.
    pub fn low_power_oversampling(mut self, oversampling: LowPowerOversampling) -> Self {
        self.config.low_power_oversampling = oversampling;
        self
    }

    /// Overrides the measurement range.
    pub fn range(mut self, range: AccelRange) -> Self {
        self.config.range = range;
        self
    }

    /// Overrides the filter 1 bandwidth.
    pub fn filter_bandwidth(mut self, bandwidth: FilterBandwidth) -> Self {
        self.config.filter_bandwidth = bandwidth;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            power_mode: PowerMode::Sleep,
            odr: OutputDataRate::Hz200,
            oversampling: Oversampling::Osr0,
            low_power_oversampling: LowPowerOversampling::Osr0,
            range: AccelRange::G4,
            filter_bandwidth: FilterBandwidth::High,
        }
    }
}
