//! Configuration types
//!
//! Deploy-time settings for the game rules, timing, LCD geometry and pin
//! assignment. Defaults reproduce the reference console.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
