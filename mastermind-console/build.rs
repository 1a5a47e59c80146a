//! Build script for mastermind-console
//!
//! Validates the embedded console.toml at compile time so a broken default
//! configuration never reaches the board.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Highest BCM GPIO line number plus one
const GPIO_COUNT: i64 = 54;
/// Colour / sequence length bound of the game core
const MAX_DIGITS: i64 = 9;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate console.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=console.toml");

    let config_path = Path::new("console.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: console.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The console embeds console.toml as its default configuration.   ║\n\
            ║  Please create one in the mastermind-console directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read console.toml                              ║\n\
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
                ║  ERROR: Invalid TOML syntax in console.toml                      ║\n\
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
    validate_game(&config, &mut errors);
    validate_lcd(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in console.toml                    ║\n\
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

    println!("cargo:warning=console.toml validated successfully");
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

/// Integer field of a section, if present
fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

fn validate_game(config: &toml::Value, errors: &mut Vec<String>) {
    for key in ["colors", "seqlen"] {
        if let Some(n) = int(config, "game", key) {
            if !(1..=MAX_DIGITS).contains(&n) {
                errors.push(format!("[game] {} must be 1-{}", key, MAX_DIGITS));
            }
        }
    }
    if let Some(n) = int(config, "game", "max_attempts") {
        if !(1..=255).contains(&n) {
            errors.push("[game] max_attempts must be 1-255".to_string());
        }
    }
    if int(config, "timing", "timeout_us") == Some(0) {
        errors.push("[timing] timeout_us cannot be zero".to_string());
    }
}

fn validate_lcd(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(bits) = int(config, "lcd", "bits") {
        if bits != 4 {
            errors.push("[lcd] bits must be 4 (only the 4-bit bus is wired)".to_string());
        }
    }
    if let Some(cols) = int(config, "lcd", "cols") {
        if !(1..=40).contains(&cols) {
            errors.push("[lcd] cols must be 1-40".to_string());
        }
    }
    if let Some(rows) = int(config, "lcd", "rows") {
        if !(1..=2).contains(&rows) {
            errors.push("[lcd] rows must be 1 or 2".to_string());
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let pins = match config.get("pins") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[pins] must be a table".to_string());
            return;
        }
        None => return,
    };

    let mut assigned: Vec<(String, i64)> = Vec::new();
    for (name, value) in pins {
        match value {
            toml::Value::Integer(pin) => assigned.push((name.clone(), *pin)),
            toml::Value::Array(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    match line.as_integer() {
                        Some(pin) => assigned.push((format!("{}[{}]", name, i), pin)),
                        None => errors.push(format!("[pins] {}[{}] must be an integer", name, i)),
                    }
                }
            }
            _ => errors.push(format!("[pins] {} must be an integer", name)),
        }
    }

    let mut seen = HashSet::new();
    for (name, pin) in assigned {
        if !(0..GPIO_COUNT).contains(&pin) {
            errors.push(format!("[pins] {} = {} is not a GPIO line", name, pin));
        } else if !seen.insert(pin) {
            errors.push(format!("[pins] {} reuses GPIO {}", name, pin));
        }
    }
}
