//! Control loop task
//!
//! Samples the button pad and touch switch once per tick and hands the
//! snapshot to the mode controller. Events and errors from each tick are
//! logged; a failed tick never stops the loop.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::{I2C0, I2C1};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Ticker};

use bricksort_core::controller::{InputSnapshot, ModeController, TickEvents};
use bricksort_core::state::Event;
use bricksort_core::traits::{ButtonPad, TouchSensor};
use bricksort_drivers::display::Sh1106;
use bricksort_drivers::input::{GpioButtonPad, GpioTouchSensor};
use bricksort_drivers::light::RgbLight;
use bricksort_drivers::sensor::Tcs34725;

use crate::clock::EmbassyClock;
use crate::link::AxisLink;

/// Control loop period
pub const TICK_INTERVAL_MS: u64 = 10;

/// The whole machine as the control loop sees it
pub type Gantry = ModeController<
    AxisLink,
    Tcs34725<I2c<'static, I2C0, Async>>,
    Sh1106<I2c<'static, I2C1, Async>>,
    RgbLight<PwmOutput<'static>, PwmOutput<'static>, PwmOutput<'static>>,
    EmbassyClock,
>;

pub type Pad = GpioButtonPad<Input<'static>>;
pub type Touch = GpioTouchSensor<Input<'static>>;

/// Control task - calibrates once, then runs the mode controller forever
#[embassy_executor::task]
pub async fn control_task(mut gantry: Gantry, mut pad: Pad, mut touch: Touch) {
    info!("Control task started, calibrating");

    match gantry.start().await {
        Ok(events) => log_events(&gantry, &events),
        Err(e) => warn!("Startup calibration reported {:?}", e),
    }

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        let input = InputSnapshot {
            buttons: pad.pressed(),
            touch: touch.is_pressed(),
        };

        match gantry.tick(input).await {
            Ok(events) => log_events(&gantry, &events),
            Err(e) => warn!("Control tick failed: {:?}", e),
        }

        ticker.next().await;
    }
}

fn log_events(gantry: &Gantry, events: &TickEvents) {
    for event in events {
        match event {
            Event::Stored(label) => {
                info!("Stored {} brick", label.name());
                log_inventory(gantry);
            }
            Event::Retrieved(label) => {
                info!("Retrieved {} brick", label.name());
                log_inventory(gantry);
            }
            Event::AlreadyStored(label) => debug!("{} bin already full", label.name()),
            Event::NothingToRetrieve(label) => debug!("{} bin is empty", label.name()),
            Event::VerticalJog(on) => debug!("Z-axis jog mode: {}", on),
            _ if event.is_mode_event() => info!("{:?} -> {}", event, gantry.mode().name()),
            _ => debug!("{:?}", event),
        }
    }
}

fn log_inventory(gantry: &Gantry) {
    let inventory = gantry.inventory();
    info!("{} of 6 bins full", inventory.occupied_count());
    for slot in inventory.slots() {
        debug!("  {}: {}", slot.label.name(), if slot.occupied { "full" } else { "empty" });
    }
}
