//! Parser for `meter.toml`
//!
//! Handles only the subset the tap configuration needs, without
//! allocation:
//!
//! - `[bus]` and `[report]` section headers
//! - `key = value` pairs (string, integer, boolean)
//! - Comments (`# ...`), including trailing comments
//!
//! Unknown sections and keys are errors, so typos do not silently fall
//! back to defaults.

use super::types::{MeterConfig, PinConfig};

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type
    InvalidValue,
    /// Pin string is not `gpioN` / `^gpioN`, or N is out of range
    InvalidPin,
    /// Two bus lines share a pin
    DuplicatePin,
    /// Report interval outside the supported range
    IntervalOutOfRange,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Report,
}

/// Parse TOML text into a validated [`MeterConfig`]
///
/// Keys that are absent keep their default value.
pub fn parse_config(input: &str) -> Result<MeterConfig, ConfigError> {
    let mut config = MeterConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(line)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse a section header line like `[bus]`
fn parse_section_header(line: &str) -> Result<Section, ConfigError> {
    let header = line
        .strip_prefix('[')
        .and_then(|l| l.split('#').next())
        .map(str::trim)
        .and_then(|l| l.strip_suffix(']'))
        .ok_or(ConfigError::InvalidSection)?;

    match header.trim() {
        "bus" => Ok(Section::Bus),
        "report" => Ok(Section::Report),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MeterConfig,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Bus, "cs_pin") => config.bus.cs = parse_pin(value)?,
        (Section::Bus, "clk_pin") => config.bus.clk = parse_pin(value)?,
        (Section::Bus, "data_pin") => config.bus.data = parse_pin(value)?,
        (Section::Report, "interval_ms") => config.report.interval_ms = parse_int(value)?,
        (Section::Report, "raw_dump") => config.report.raw_dump = parse_bool(value)?,
        (Section::Report, "log_capture_stats") => {
            config.report.log_capture_stats = parse_bool(value)?
        }
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a pin string like "gpio2" or "^gpio2" (pull-up)
pub fn parse_pin(value: &str) -> Result<PinConfig, ConfigError> {
    let s = parse_string(value).trim();
    let (s, pull_up) = match s.strip_prefix('^') {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    let pin: u8 = s
        .strip_prefix("gpio")
        .ok_or(ConfigError::InvalidPin)?
        .parse()
        .map_err(|_| ConfigError::InvalidPin)?;

    if pin >= super::types::GPIO_COUNT {
        return Err(ConfigError::InvalidPin);
    }

    Ok(PinConfig { pin, pull_up })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = r#"
# Reference wiring
[bus]
cs_pin = "gpio2"    # CS, active low
clk_pin = "gpio3"
data_pin = "^gpio4"

[report]
interval_ms = 500
raw_dump = true
log_capture_stats = false
"#;

    #[test]
    fn test_parse_reference() {
        let config = parse_config(REFERENCE).unwrap();

        assert_eq!(config.bus.cs, PinConfig::new(2));
        assert_eq!(config.bus.clk, PinConfig::new(3));
        assert_eq!(config.bus.data, PinConfig::with_pullup(4));
        assert_eq!(config.report.interval_ms, 500);
        assert!(config.report.raw_dump);
        assert!(!config.report.log_capture_stats);
    }

    #[test]
    fn test_empty_input_uses_defaults() {
        assert_eq!(parse_config(""), Ok(MeterConfig::default()));
        assert_eq!(parse_config("# nothing here

"), Ok(MeterConfig::default()));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = parse_config("[report]\nraw_dump = true\n").unwrap();
        assert!(config.report.raw_dump);
        assert_eq!(config.report.interval_ms, 1000);
        assert_eq!(config.bus, MeterConfig::default().bus);
    }

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("\"gpio7\""), Ok(PinConfig::new(7)));
        assert_eq!(parse_pin("\"^gpio29\""), Ok(PinConfig::with_pullup(29)));
        assert_eq!(parse_pin("gpio12"), Ok(PinConfig::new(12)));
        assert_eq!(parse_pin("\"gpio30\""), Err(ConfigError::InvalidPin));
        assert_eq!(parse_pin("\"pin4\""), Err(ConfigError::InvalidPin));
        assert_eq!(parse_pin("\"!gpio4\""), Err(ConfigError::InvalidPin));
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_config("[display]\n"), Err(ConfigError::InvalidSection));
        assert_eq!(parse_config("[bus\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[bus]\nreset_pin = \"gpio5\"\n"),
            Err(ConfigError::UnknownKey)
        );
        // Keys outside any section
        assert_eq!(parse_config("raw_dump = true\n"), Err(ConfigError::UnknownKey));
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[report]\nraw_dump = yes\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[report]\ninterval_ms = -5\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(parse_config("[report]\ninterval_ms\n"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        assert_eq!(
            parse_config("[bus]\ncs_pin = \"gpio3\"\n"),
            Err(ConfigError::DuplicatePin)
        );
        assert_eq!(
            parse_config("[report]\ninterval_ms = 99\n"),
            Err(ConfigError::IntervalOutOfRange)
        );
    }

    #[test]
    fn test_inline_comment_inside_string_kept() {
        assert_eq!(parse_key_value("a = \"x#y\""), Some(("a", "\"x#y\"")));
        assert_eq!(parse_key_value("a = 5 # five"), Some(("a", "5")));
    }
}
