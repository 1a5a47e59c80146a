//! Game session state machine
//!
//! Rounds are driven by an explicit, finite, deterministic transition
//! function. The session applies events; it never sets states directly.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
