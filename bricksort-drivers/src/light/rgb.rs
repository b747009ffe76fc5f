//! PWM RGB status light

use bricksort_core::traits::{LightColor, StatusLight};
use embedded_hal::pwm::SetDutyCycle;

/// Common-cathode RGB LED on three PWM channels
pub struct RgbLight<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> RgbLight<R, G, B> {
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self { red, green, blue }
    }
}

/// Channel levels in percent for a light color
pub fn mix(color: LightColor) -> (u8, u8, u8) {
    match color {
        LightColor::Off => (0, 0, 0),
        LightColor::Red => (100, 0, 0),
        LightColor::Green => (0, 100, 0),
        LightColor::Orange => (100, 30, 0),
        LightColor::Yellow => (100, 90, 0),
    }
}

impl<R: SetDutyCycle, G: SetDutyCycle, B: SetDutyCycle> StatusLight for RgbLight<R, G, B> {
    fn set(&mut self, color: LightColor) {
        let (r, g, b) = mix(color);
        // A failed PWM write leaves the previous color showing
        let _ = self.red.set_duty_cycle_percent(r);
        let _ = self.green.set_duty_cycle_percent(g);
        let _ = self.blue.set_duty_cycle_percent(b);
    }
}
