//! Operating mode state machine

pub mod edge;
pub mod events;
pub mod machine;

pub use edge::ButtonEdge;
pub use events::Event;
pub use machine::OperatingMode;
