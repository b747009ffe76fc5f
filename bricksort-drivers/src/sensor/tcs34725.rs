//! TCS34725 RGB color sensor driver
//!
//! Reads the clear/red/green/blue photodiode counts over I2C and scales
//! them to percent of the integration full scale, with a per-channel dark
//! offset subtracted. Small negative readings are therefore possible.

use bricksort_core::traits::{ColorSensor, Rgb, SensorError};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Fixed 7-bit bus address
pub const TCS34725_ADDR: u8 = 0x29;

/// Register map (addresses before OR-ing the command bit)
mod reg {
    pub const ENABLE: u8 = 0x00;
    pub const ATIME: u8 = 0x01;
    pub const CONTROL: u8 = 0x0F;
    pub const ID: u8 = 0x12;
    pub const STATUS: u8 = 0x13;
    pub const CDATAL: u8 = 0x14;
}

/// Command byte: select register
const COMMAND: u8 = 0x80;
/// Command byte: select register with auto-increment
const COMMAND_AUTO: u8 = 0xA0;

const ENABLE_PON: u8 = 0x01;
const ENABLE_AEN: u8 = 0x02;
const STATUS_AVALID: u8 = 0x01;

/// Part IDs of the TCS34725 and TCS34727
const KNOWN_IDS: [u8; 2] = [0x44, 0x4D];

/// Analog gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    X1,
    X4,
    X16,
    X60,
}

impl Gain {
    fn bits(self) -> u8 {
        match self {
            Gain::X1 => 0b00,
            Gain::X4 => 0b01,
            Gain::X16 => 0b10,
            Gain::X60 => 0b11,
        }
    }
}

/// Sensor setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tcs34725Config {
    /// Integration cycles of 2.4 ms each (1-256)
    pub integration_cycles: u16,
    pub gain: Gain,
    /// Per-channel reading in percent with no brick present
    pub dark: Rgb,
}

impl Default for Tcs34725Config {
    fn default() -> Self {
        Self {
            integration_cycles: 10,
            gain: Gain::X4,
            dark: Rgb::new(0, 0, 0),
        }
    }
}

impl Tcs34725Config {
    /// Highest count a channel can reach at this integration time
    pub fn full_scale(&self) -> u32 {
        (self.integration_cycles.clamp(1, 256) as u32 * 1024).min(u16::MAX as u32)
    }

    fn atime(&self) -> u8 {
        (256 - self.integration_cycles.clamp(1, 256)) as u8
    }
}

/// TCS34725 driver
pub struct Tcs34725<I2C> {
    i2c: I2C,
    config: Tcs34725Config,
}

impl<I2C: I2c> Tcs34725<I2C> {
    pub fn new(i2c: I2C, config: Tcs34725Config) -> Self {
        Self { i2c, config }
    }

    /// Check the part ID, program integration and gain, start converting
    pub async fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), SensorError> {
        let id = self.read_register(reg::ID).await?;
        if !KNOWN_IDS.contains(&id) {
            return Err(SensorError::WrongDevice);
        }

        self.write_register(reg::ATIME, self.config.atime()).await?;
        self.write_register(reg::CONTROL, self.config.gain.bits())
            .await?;

        // Oscillator needs 2.4 ms after power-on before the ADC is enabled
        self.write_register(reg::ENABLE, ENABLE_PON).await?;
        delay.delay_ms(3).await;
        self.write_register(reg::ENABLE, ENABLE_PON | ENABLE_AEN)
            .await
    }

    /// Raw clear, red, green, blue counts
    pub async fn read_raw(&mut self) -> Result<[u16; 4], SensorError> {
        let status = self.read_register(reg::STATUS).await?;
        if status & STATUS_AVALID == 0 {
            return Err(SensorError::NotReady);
        }

        let mut buf = [0u8; 8];
        self.i2c
            .write_read(TCS34725_ADDR, &[COMMAND_AUTO | reg::CDATAL], &mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;

        Ok([
            u16::from_le_bytes([buf[0], buf[1]]),
            u16::from_le_bytes([buf[2], buf[3]]),
            u16::from_le_bytes([buf[4], buf[5]]),
            u16::from_le_bytes([buf[6], buf[7]]),
        ])
    }

    /// Convert a raw count to percent of full scale
    fn percent(&self, count: u16) -> i32 {
        (count as u32 * 100 / self.config.full_scale()) as i32
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(TCS34725_ADDR, &[COMMAND | register], &mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(TCS34725_ADDR, &[COMMAND | register, value])
            .await
            .map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> ColorSensor for Tcs34725<I2C> {
    async fn rgb(&mut self) -> Result<Rgb, SensorError> {
        let [_, r, g, b] = self.read_raw().await?;
        let dark = self.config.dark;
        Ok(Rgb::new(
            self.percent(r) - dark.r,
            self.percent(g) - dark.g,
            self.percent(b) - dark.b,
        ))
    }
}
