//! Build script for bricksort-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml and embeds it as postcard binary data

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bricksort_core::config::{ConfigError, RobotConfig, MAX_CONFIG_SIZE};

fn main() {
    setup_linker();
    embed_config();
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
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse, validate and serialize machine.toml into OUT_DIR/machine.bin
fn embed_config() {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a machine.toml configuration file.        ║\n\
            ║  Please create one in the bricksort-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read machine.toml", &e.to_string()),
    };

    let config: RobotConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail("Invalid machine.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail("machine.toml failed validation", describe(e));
    }

    let mut buf = [0u8; MAX_CONFIG_SIZE];
    let bytes = match config.encode(&mut buf) {
        Ok(bytes) => bytes,
        Err(e) => fail("machine.toml does not fit the config image", describe(e)),
    };

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("machine.bin")).unwrap();
    f.write_all(bytes).unwrap();
}

fn describe(error: ConfigError) -> &'static str {
    match error {
        ConfigError::InvalidBounds(_) => "an axis has min_angle >= max_angle",
        ConfigError::InvalidSpeed(_) => "jog_speed and move_speed must be positive",
        ConfigError::WaypointOutOfRange(_) => "a layout waypoint is outside the axis travel",
        ConfigError::InvalidThreshold => "palette threshold must be positive",
        ConfigError::AmbiguousPalette => "two palette references are within threshold",
        ConfigError::InvalidTorque => "stall_torque_pct must be within 1..=100",
        ConfigError::Encode => "encoded config exceeds MAX_CONFIG_SIZE",
        ConfigError::Decode => "encoded config is corrupt",
    }
}

/// Abort the build with a framed message
fn fail(title: &str, detail: &str) -> ! {
    let mut msg = String::new();
    msg.push_str("\n╔══════════════════════════════════════════════════════════════════╗\n");
    msg.push_str(&format!("║  ERROR: {:<57}║\n", title));
    msg.push_str("╠══════════════════════════════════════════════════════════════════╣\n");
    for line in detail.lines() {
        msg.push_str(&format!("║  {:<64}║\n", line));
    }
    msg.push_str("╚══════════════════════════════════════════════════════════════════╝\n");
    panic!("{}", msg);
}
