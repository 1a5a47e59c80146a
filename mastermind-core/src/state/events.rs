//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Every position of the guess holds an accepted digit
    GuessEntered,
    /// The guess has been scored and the result rendered
    Scored,

    // End-of-round decisions
    /// Every peg matched exactly
    SecretFound,
    /// Attempt counter reached the limit without a win
    AttemptsExhausted,
    /// Neither won nor lost, play another round
    NextRound,
}

impl Event {
    /// Check if this event is decided at the end of a round
    pub fn is_round_outcome(&self) -> bool {
        matches!(
            self,
            Event::SecretFound | Event::AttemptsExhausted | Event::NextRound
        )
    }
}
