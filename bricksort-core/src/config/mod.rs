//! Configuration types
//!
//! Board-agnostic machine tuning, stored as postcard binary data.

pub mod types;

pub use types::*;
