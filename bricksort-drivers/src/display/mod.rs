//! Display driver implementations

pub mod sh1106;

pub use sh1106::{Sh1106, CONSOLE_ROWS, SH1106_ADDR};
