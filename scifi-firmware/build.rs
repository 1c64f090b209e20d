//! Build script for scifi-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panels.toml at compile time
//! - Generates panel_config.rs constants from it

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Strobe pins wired on the board (GPIO10-13)
const MAX_PANELS: i64 = 4;

/// Animation timing keys, in AnimationTiming field order
const TIMING_KEYS: [&str; 5] = [
    "message_blank",
    "message_shown",
    "leds_flash_off",
    "leds_flash_on",
    "leds_blink",
];

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of panels.toml
struct PanelConfig {
    count: i64,
    brightness: i64,
    baud: i64,
    tick_ms: i64,
    seed: i64,
    timing: Vec<i64>,
}

/// Validate panels.toml at compile time
fn validate_config() -> PanelConfig {
    println!("cargo:rerun-if-changed=panels.toml");

    let config_path = Path::new("panels.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panels.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panels.toml configuration file.         ║\n\
            ║  Please create one in the scifi-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panels.toml                               ║\n\
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
                ║  ERROR: Invalid TOML syntax in panels.toml                       ║\n\
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

    let count = integer(&config, "panels", "count", 1..=MAX_PANELS, &mut errors);
    let brightness = integer(&config, "panels", "brightness", 0..=8, &mut errors);
    let baud = integer(&config, "link", "baud", 1200..=921_600, &mut errors);
    let tick_ms = integer(&config, "control", "tick_ms", 1..=100, &mut errors);
    let seed = integer(&config, "control", "seed", 0..=u32::MAX as i64, &mut errors);
    let timing = TIMING_KEYS
        .iter()
        .map(|key| integer(&config, "timing", key, 1..=u32::MAX as i64, &mut errors))
        .collect();

    report("Invalid panel configuration", &errors);

    println!("cargo:warning=panels.toml validated successfully");

    PanelConfig {
        count,
        brightness,
        baud,
        tick_ms,
        seed,
        timing,
    }
}

/// Look up `[section] key` and check it is an integer in `range`
///
/// Problems are pushed to `errors`; the returned value is then meaningless.
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let table = match config.get(section) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return 0;
        }
        None => {
            errors.push(format!("Missing [{}] section", section));
            return 0;
        }
    };

    match table.get(key) {
        Some(toml::Value::Integer(value)) => {
            if !range.contains(value) {
                errors.push(format!(
                    "[{}] {} must be {}-{}",
                    section,
                    key,
                    range.start(),
                    range.end()
                ));
            }
            *value
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0
        }
    }
}

/// Write panel_config.rs into OUT_DIR
fn generate_config(config: &PanelConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("panel_config.rs")).unwrap();

    let timing = TIMING_KEYS
        .iter()
        .zip(&config.timing)
        .map(|(key, value)| format!("    {}: {},\n", key, value))
        .collect::<String>();

    write!(
        f,
        "// Generated from panels.toml by build.rs\n\
        \n\
        /// Panels attached to the chain\n\
        pub const PANEL_COUNT: usize = {};\n\
        /// Brightness applied to every panel at boot\n\
        pub const BRIGHTNESS: u8 = {};\n\
        /// Host UART baud rate\n\
        pub const BAUD_RATE: u32 = {};\n\
        /// Control loop tick period in milliseconds\n\
        pub const TICK_MS: u64 = {};\n\
        /// LED blink random seed\n\
        pub const RNG_SEED: u32 = {};\n\
        \n\
        /// Animation phase lengths\n\
        pub const TIMING: AnimationTiming = AnimationTiming {{\n\
        {}}};\n",
        config.count, config.brightness, config.baud, config.tick_ms, config.seed, timing
    )
    .unwrap();
}

/// Panic with a boxed list of errors, if there are any
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
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
