//! Shaft encoders

pub mod quadrature;

pub use quadrature::{counts_to_degrees, EncoderConfig, QuadratureDecoder};
