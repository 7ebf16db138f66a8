//! Build script for segtap-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates meter.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIO pins usable for the bus (0 and 1 carry the report UART)
const BUS_PINS: std::ops::Range<i64> = 2..30;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate meter.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=meter.toml");

    let config_path = Path::new("meter.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: meter.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds meter.toml to know which GPIOs carry the    ║\n\
            ║  CS, CLK and DATA lines. Create one in segtap-firmware/.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read meter.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in meter.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_bus(&config, &mut errors);
    validate_report(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in meter.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=meter.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only [bus] and [report] are understood by the firmware parser
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        match (name.as_str(), value) {
            ("bus" | "report", toml::Value::Table(_)) => {}
            ("bus" | "report", _) => errors.push(format!("[{}] must be a table", name)),
            _ => errors.push(format!("unknown section or key '{}'", name)),
        }
    }
}

/// Parse "gpioN" / "^gpioN" into N
fn pin_number(value: &str) -> Option<i64> {
    value
        .strip_prefix('^')
        .unwrap_or(value)
        .strip_prefix("gpio")?
        .parse()
        .ok()
}

fn validate_bus(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(bus) = config.get("bus").and_then(|b| b.as_table()) else {
        return;
    };

    let mut seen: Vec<(i64, &str)> = Vec::new();
    for (key, value) in bus {
        if !["cs_pin", "clk_pin", "data_pin"].contains(&key.as_str()) {
            errors.push(format!("[bus] unknown key '{}'", key));
            continue;
        }

        let Some(pin) = value.as_str().and_then(pin_number) else {
            errors.push(format!("[bus] {} must be a string like \"gpio2\"", key));
            continue;
        };

        if !BUS_PINS.contains(&pin) {
            errors.push(format!("[bus] {} must be gpio2-gpio29", key));
        }
        if let Some((_, other)) = seen.iter().find(|(p, _)| *p == pin) {
            errors.push(format!("[bus] {} and {} share gpio{}", other, key, pin));
        }
        seen.push((pin, key));
    }
}

fn validate_report(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(report) = config.get("report").and_then(|r| r.as_table()) else {
        return;
    };

    for (key, value) in report {
        match (key.as_str(), value) {
            ("interval_ms", toml::Value::Integer(ms)) => {
                if !(100..=60_000).contains(ms) {
                    errors.push("[report] interval_ms must be 100-60000".to_string());
                }
            }
            ("raw_dump" | "log_capture_stats", toml::Value::Boolean(_)) => {}
            ("interval_ms", _) => errors.push("[report] interval_ms must be an integer".to_string()),
            ("raw_dump" | "log_capture_stats", _) => {
                errors.push(format!("[report] {} must be true or false", key))
            }
            _ => errors.push(format!("[report] unknown key '{}'", key)),
        }
    }
}
