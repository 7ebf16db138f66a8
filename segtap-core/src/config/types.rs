//! Configuration type definitions
//!
//! These types describe how the tap is wired and how often it reports.
//! Defaults match the reference wiring in `meter.toml`.

use super::parse::ConfigError;

/// Number of GPIO pins on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Shortest supported report interval
pub const MIN_REPORT_INTERVAL_MS: u32 = 100;

/// Longest supported report interval
pub const MAX_REPORT_INTERVAL_MS: u32 = 60_000;

/// Input pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self { pin, pull_up: true }
    }
}

/// The three tapped bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Chip-select (active low)
    pub cs: PinConfig,
    /// Clock (sampled on rising edges)
    pub clk: PinConfig,
    /// Data
    pub data: PinConfig,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            cs: PinConfig::new(2),
            clk: PinConfig::new(3),
            data: PinConfig::new(4),
        }
    }
}

/// Reporting loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportConfig {
    /// Time between reports
    pub interval_ms: u32,
    /// Also print the sixteen raw digit slots in binary
    pub raw_dump: bool,
    /// Log capture counters with every report
    pub log_capture_stats: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            raw_dump: false,
            log_capture_stats: true,
        }
    }
}

/// Complete tap configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeterConfig {
    pub bus: BusConfig,
    pub report: ReportConfig,
}

impl MeterConfig {
    /// Check pin numbers and interval range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = [self.bus.cs.pin, self.bus.clk.pin, self.bus.data.pin];
        if pins.iter().any(|&p| p >= GPIO_COUNT) {
            return Err(ConfigError::InvalidPin);
        }
        if pins[0] == pins[1] || pins[0] == pins[2] || pins[1] == pins[2] {
            return Err(ConfigError::DuplicatePin);
        }
        if !(MIN_REPORT_INTERVAL_MS..=MAX_REPORT_INTERVAL_MS).contains(&self.report.interval_ms) {
            return Err(ConfigError::IntervalOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(MeterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let mut config = MeterConfig::default();
        config.bus.data = config.bus.clk;
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin));
    }

    #[test]
    fn test_pin_out_of_range_rejected() {
        let mut config = MeterConfig::default();
        config.bus.cs = PinConfig::new(30);
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin));
    }

    #[test]
    fn test_interval_range() {
        let mut config = MeterConfig::default();
        config.report.interval_ms = 50;
        assert_eq!(config.validate(), Err(ConfigError::IntervalOutOfRange));
        config.report.interval_ms = MAX_REPORT_INTERVAL_MS;
        assert_eq!(config.validate(), Ok(()));
    }
}
