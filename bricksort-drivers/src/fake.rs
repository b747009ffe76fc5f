//! Test doubles for bus and pin traits

use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

/// I2C bus with a 256-byte register file per transaction target
///
/// The first written byte selects the register (low five bits, as the
/// TCS34725 command byte does); further bytes are stored from there and
/// reads continue from the selected register.
pub struct FakeI2c {
    pub registers: [u8; 256],
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail: bool,
    pointer: usize,
}

impl FakeI2c {
    pub fn new() -> Self {
        Self {
            registers: [0; 256],
            writes: Vec::new(),
            fail: false,
            pointer: 0,
        }
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for FakeI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.writes.push((address, bytes.to_vec()));
                    if let Some((command, data)) = bytes.split_first() {
                        self.pointer = (command & 0x1F) as usize;
                        for (i, b) in data.iter().enumerate() {
                            self.registers[self.pointer + i] = *b;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for (i, b) in buf.iter_mut().enumerate() {
                        *b = self.registers[self.pointer + i];
                    }
                }
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately
pub struct NoDelay;

impl embedded_hal_async::delay::DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}
