//! GPIO button pad and touch switch
//!
//! Buttons and the touch switch close to ground with pull-ups enabled, so a
//! low level reads as pressed. A pin read error counts as released.

use bricksort_core::traits::{Button, ButtonPad, ButtonSet, TouchSensor};
use embedded_hal::digital::InputPin;

/// Five-button pad on individual GPIOs
pub struct GpioButtonPad<P> {
    /// Pins in [`Button::ALL`] order
    pins: [P; 5],
}

impl<P: InputPin> GpioButtonPad<P> {
    pub fn new(left: P, right: P, up: P, down: P, center: P) -> Self {
        Self {
            pins: [left, right, up, down, center],
        }
    }
}

impl<P: InputPin> ButtonPad for GpioButtonPad<P> {
    fn pressed(&mut self) -> ButtonSet {
        let mut set = ButtonSet::empty();
        for (pin, button) in self.pins.iter_mut().zip(Button::ALL) {
            if pin.is_low().unwrap_or(false) {
                set.insert(button);
            }
        }
        set
    }
}

/// Touch switch on one GPIO
pub struct GpioTouchSensor<P> {
    pin: P,
}

impl<P: InputPin> GpioTouchSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> TouchSensor for GpioTouchSensor<P> {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }
}
