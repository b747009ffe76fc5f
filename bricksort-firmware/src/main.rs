//! Bricksort - Gantry Brick Sorter Firmware
//!
//! Main firmware binary for the RP2040-based three-axis sorting gantry.
//! Every axis servo and encoder runs in its own task; a single control
//! task owns the sensor, display, light and inputs and drives the modes.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use bricksort_core::axis::{Axes, Axis};
use bricksort_core::config::RobotConfig;
use bricksort_core::controller::ModeController;
use bricksort_core::motion::MotionSequencer;
use bricksort_drivers::display::Sh1106;
use bricksort_drivers::encoder::EncoderConfig;
use bricksort_drivers::input::{GpioButtonPad, GpioTouchSensor};
use bricksort_drivers::light::RgbLight;
use bricksort_drivers::sensor::{Tcs34725, Tcs34725Config};

use crate::clock::EmbassyClock;
use crate::link::AxisLink;

mod channels;
mod clock;
mod link;
mod tasks;

/// Validated machine.toml, postcard-encoded by build.rs
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/machine.bin"));

/// I2C bus speed for the sensor and the display
const I2C_FREQUENCY: u32 = 400_000;

/// PWM top for the status light
const LIGHT_PWM_TOP: u16 = 1000;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Bricksort firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Axis motors: PWM magnitude on channel A, direction on the next pin
    // X: GPIO8/9, Y: GPIO10/11, Z: GPIO12/13
    let x_pwm = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, PwmConfig::default());
    let y_pwm = Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, PwmConfig::default());
    let z_pwm = Pwm::new_output_a(p.PWM_SLICE6, p.PIN_12, PwmConfig::default());
    let x_dir = Output::new(p.PIN_9, Level::Low);
    let y_dir = Output::new(p.PIN_11, Level::Low);
    let z_dir = Output::new(p.PIN_13, Level::Low);

    // Encoders: X A/B GPIO14/15, Y GPIO16/17, Z GPIO18/19
    let x_enc = (Input::new(p.PIN_14, Pull::Up), Input::new(p.PIN_15, Pull::Up));
    let y_enc = (Input::new(p.PIN_16, Pull::Up), Input::new(p.PIN_17, Pull::Up));
    let z_enc = (Input::new(p.PIN_18, Pull::Up), Input::new(p.PIN_19, Pull::Up));

    info!("Motor and encoder pins initialized");

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;

    // TCS34725 on I2C0 (SDA GPIO4, SCL GPIO5)
    let sensor_bus = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config.clone());
    let mut sensor = Tcs34725::new(sensor_bus, Tcs34725Config::default());
    match sensor.init(&mut Delay).await {
        Ok(()) => info!("Color sensor initialized"),
        Err(e) => error!("Color sensor init failed: {:?}", e),
    }

    // SH1106 on I2C1 (SDA GPIO2, SCL GPIO3)
    let display_bus = I2c::new_async(p.I2C1, p.PIN_3, p.PIN_2, Irqs, i2c_config);
    let mut display = Sh1106::new(display_bus);
    match display.init().await {
        Ok(()) => info!("Display initialized"),
        Err(e) => error!("Display init failed: {:?}", e),
    }

    // Status light: red GPIO0, green GPIO1, blue GPIO6
    let mut light_config = PwmConfig::default();
    light_config.top = LIGHT_PWM_TOP;
    let (red, green) =
        Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, light_config.clone()).split();
    let (blue, _) = Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, light_config).split();
    let light = RgbLight::new(unwrap!(red), unwrap!(green), unwrap!(blue));

    // Button pad and touch switch, all active low
    let pad = GpioButtonPad::new(
        Input::new(p.PIN_20, Pull::Up),
        Input::new(p.PIN_21, Pull::Up),
        Input::new(p.PIN_22, Pull::Up),
        Input::new(p.PIN_26, Pull::Up),
        Input::new(p.PIN_27, Pull::Up),
    );
    let touch = GpioTouchSensor::new(Input::new(p.PIN_28, Pull::Up));

    info!("Sensor, display, light and inputs initialized");

    let axes = Axes::new(
        (AxisLink::new(Axis::X), config.x),
        (AxisLink::new(Axis::Y), config.y),
        (AxisLink::new(Axis::Z), config.z),
    );
    let sequencer = MotionSequencer::new(
        axes,
        sensor,
        config.palette,
        config.layout,
        config.calibration,
    );
    let gantry = ModeController::new(sequencer, display, light, EmbassyClock::new(), config.timing);

    // Spawn tasks
    let encoder = EncoderConfig::default();
    spawner.spawn(tasks::encoder_task(Axis::X, x_enc.0, x_enc.1, encoder)).unwrap();
    spawner.spawn(tasks::encoder_task(Axis::Y, y_enc.0, y_enc.1, encoder)).unwrap();
    spawner.spawn(tasks::encoder_task(Axis::Z, z_enc.0, z_enc.1, encoder)).unwrap();

    let drive = tasks::AxisDriveConfig::default();
    spawner.spawn(tasks::axis_task(Axis::X, x_pwm, x_dir, drive)).unwrap();
    spawner.spawn(tasks::axis_task(Axis::Y, y_pwm, y_dir, drive)).unwrap();
    spawner.spawn(tasks::axis_task(Axis::Z, z_pwm, z_dir, drive)).unwrap();

    spawner.spawn(tasks::control_task(gantry, pad, touch)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Decode the embedded configuration
///
/// build.rs only embeds a configuration that passed validation, so the
/// fallback is for a corrupted image.
fn load_config() -> RobotConfig {
    match RobotConfig::decode(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Loaded embedded configuration ({} bytes)", EMBEDDED_CONFIG.len());
            config
        }
        Err(e) => {
            error!("Failed to decode embedded config: {:?}", e);
            error!("Using built-in defaults");
            RobotConfig::default()
        }
    }
}
