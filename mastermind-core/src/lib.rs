//! Board-agnostic core logic for the Mastermind console
//!
//! This crate contains all game logic that does not depend on specific
//! hardware implementations:
//!
//! - Configuration type definitions and validation
//! - Fixed-capacity colour sequences and secret decoding
//! - The matching engine (exact / approximate scoring)
//! - The session state machine driving one game
//! - Device traits implemented by the drivers crate

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod matcher;
pub mod sequence;
pub mod session;
pub mod state;
pub mod traits;

pub use config::{ConfigError, GameConfig, LcdConfig, PinMap, TimingConfig};
pub use matcher::{score, score_encoded, MatchResult};
pub use sequence::{Sequence, SequenceError, MAX_COLORS, MAX_SEQ_LEN};
pub use session::{GameSession, Outcome, RoundReport};
pub use state::{Event, State};
