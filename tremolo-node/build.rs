//! Build script for tremolo-node
//!
//! Validates the embedded feedback.toml at compile time, so a broken
//! default configuration never reaches a device.

use std::fs;
use std::path::Path;

/// Highest LED count the core can address
const MAX_LEDS: i64 = 4;

/// Config format version the core accepts
const CONFIG_VERSION: i64 = 1;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate feedback.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=feedback.toml");

    let config_path = Path::new("feedback.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read feedback.toml                             ║\n\
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
                ║  ERROR: Invalid TOML syntax in feedback.toml                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                box_lines(error_msg.lines(), "")
            );
        }
    };

    let errors = validate_fields(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in feedback.toml                          ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            box_lines(errors.iter().map(String::as_str), "• ")
        );
    }
}

/// Text columns inside the error box
const BOX_WIDTH: usize = 64;

/// Fit lines into the error box, cutting long ones on a char boundary
fn box_lines<'a>(lines: impl Iterator<Item = &'a str>, bullet: &str) -> String {
    let width = BOX_WIDTH - bullet.chars().count();
    lines
        .map(|line| {
            let text: String = if line.chars().count() > width {
                line.chars().take(width - 3).chain("...".chars()).collect()
            } else {
                line.to_string()
            };
            format!("║  {}{:<width$} ║", bullet, text, width = width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check field types and ranges; missing fields take runtime defaults
fn validate_fields(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    match config.get("version") {
        None => {}
        Some(toml::Value::Integer(v)) if *v == CONFIG_VERSION => {}
        Some(_) => errors.push(format!("version must be {}", CONFIG_VERSION)),
    }

    let device = match config.get("device") {
        None => return errors,
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[device] must be a table".to_string());
            return errors;
        }
    };

    match device.get("leds") {
        None => {}
        Some(toml::Value::Integer(n)) if (1..=MAX_LEDS).contains(n) => {}
        Some(_) => errors.push(format!("[device] leds must be 1-{}", MAX_LEDS)),
    }

    match device.get("rumble") {
        None | Some(toml::Value::Boolean(_)) => {}
        Some(_) => errors.push("[device] rumble must be true or false".to_string()),
    }

    errors
}
