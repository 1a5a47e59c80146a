//! State machine definition
//!
//! Feedback rendered by the session is a function of the current state.

use super::events::Event;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Collecting one digit per position from the button
    AwaitingGuess,
    /// Guess complete, matching and rendering the score
    Scoring,
    /// Score shown, attempt counted, deciding what comes next
    RoundComplete,
    /// Secret found
    Won,
    /// Attempts exhausted
    Lost,
}

impl State {
    /// Check if the game is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Won | State::Lost)
    }

    /// Check if this state reads the button
    pub fn accepts_input(&self) -> bool {
        matches!(self, State::AwaitingGuess)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            (AwaitingGuess, GuessEntered) => Scoring,
            (Scoring, Scored) => RoundComplete,

            // A win takes precedence; the caller only reports exhaustion
            // when the last round was not solved
            (RoundComplete, SecretFound) => Won,
            (RoundComplete, AttemptsExhausted) => Lost,
            (RoundComplete, NextRound) => AwaitingGuess,

            // Default: stay in current state
            _ => self,
        }
    }
}
