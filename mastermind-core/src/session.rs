//! Game session
//!
//! Owns the secret, the attempt counter and the current [`State`], and runs
//! one round at a time against the console devices:
//!
//! ```text
//!  AwaitingGuess ──GuessEntered──► Scoring ──Scored──► RoundComplete
//!        ▲                                                  │
//!        └──────────────────── NextRound ◄──────────────────┤
//!                                      SecretFound ──► Won ◄┤
//!                                AttemptsExhausted ──► Lost ◄┘
//! ```
//!
//! Invalid button counts are absorbed while awaiting a guess; only device
//! failures escape a round.

use core::fmt::{self, Write};

use heapless::String;
use rand::Rng;

use crate::config::GameConfig;
use crate::matcher::{score, MatchResult};
use crate::sequence::{color_name, Sequence, SequenceError};
use crate::state::{Event, State};
use crate::traits::{DeviceError, DigitInput, Indicator, Indicators, TextDisplay};

/// Capacity of one LCD message
const LINE_CAP: usize = 64;
/// Capacity of the scrolling welcome banner
const BANNER_CAP: usize = 160;

/// How a finished game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Secret found
    Won,
    /// Attempts exhausted
    Lost,
}

/// Summary of one played round
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoundReport {
    /// Attempt number of this round (1-based)
    pub attempt: u8,
    /// Accepted guess
    pub guess: Sequence,
    /// Score of the guess
    pub result: MatchResult,
    /// Button counts rejected as out of range
    pub rejected: u8,
    /// State after the round
    pub state: State,
}

/// One game from secret to outcome
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    secret: Sequence,
    attempts: u8,
    state: State,
}

impl GameSession {
    /// Create a session around an established secret
    ///
    /// The secret must hold exactly `seqlen` codes in `1..=colors`.
    pub fn new(config: GameConfig, secret: Sequence) -> Result<Self, SequenceError> {
        if secret.len() != config.seqlen as usize {
            return Err(SequenceError::MalformedSecretLength {
                expected: config.seqlen,
                found: secret.len() as u8,
            });
        }
        for (position, &peg) in secret.as_slice().iter().enumerate() {
            config.check_digit(position, peg)?;
        }

        Ok(Self {
            config,
            secret,
            attempts: 0,
            state: State::AwaitingGuess,
        })
    }

    /// Start a session from an optional pre-set encoded secret
    ///
    /// Without a preset the secret is drawn uniformly from `rng`.
    pub fn start<R: Rng + ?Sized>(
        config: GameConfig,
        preset: Option<u32>,
        rng: &mut R,
    ) -> Result<Self, SequenceError> {
        let secret = match preset {
            Some(value) => Sequence::decode(value, config.seqlen, config.colors)?,
            None => Sequence::random(rng, config.seqlen, config.colors),
        };
        Self::new(config, secret)
    }

    /// Game rules in effect
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The secret
    pub fn secret(&self) -> &Sequence {
        &self.secret
    }

    /// Rounds played so far
    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Check if the game has ended
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Final outcome, once the game has ended
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            State::Won => Some(Outcome::Won),
            State::Lost => Some(Outcome::Lost),
            _ => None,
        }
    }

    /// Scroll the welcome banner across the first row
    pub fn welcome<D: TextDisplay>(&self, display: &mut D) -> Result<(), DeviceError> {
        let banner: String<BANNER_CAP> = format_line(format_args!(
            "   Welcome to Master Mind. The sequence is {} guesses, and there are {} colors. \
             Press enter once you are ready to start. Enjoy!",
            self.config.seqlen, self.config.colors
        ));
        display.print(&banner, 0)
    }

    /// Play one full round: read a guess, score it and decide what follows
    ///
    /// On a finished game nothing is played and the returned report carries
    /// an empty guess.
    pub fn play_round<D, L, I>(
        &mut self,
        display: &mut D,
        leds: &mut L,
        input: &mut I,
    ) -> Result<RoundReport, DeviceError>
    where
        D: TextDisplay,
        L: Indicators,
        I: DigitInput,
    {
        if self.is_over() {
            return Ok(RoundReport {
                attempt: self.attempts,
                guess: Sequence::new(),
                result: MatchResult::default(),
                rejected: 0,
                state: self.state,
            });
        }

        let attempt = self.attempts.saturating_add(1);

        let (guess, rejected) = self.read_guess(display, leds, input)?;
        self.state = self.state.transition(Event::GuessEntered);

        let summary: String<LINE_CAP> =
            format_line(format_args!("Guess{}: {}", attempt, guess.initials()));
        display.print(&summary, 0)?;
        leds.blink(Indicator::Red, 2)?;

        let result = score(&self.secret, &guess);
        self.show_score(display, leds, result)?;
        self.state = self.state.transition(Event::Scored);
        // Only a scored guess uses up an attempt
        self.attempts = attempt;

        let event = if result.is_solved(self.config.seqlen) {
            Event::SecretFound
        } else if self.attempts >= self.config.max_attempts {
            Event::AttemptsExhausted
        } else {
            Event::NextRound
        };
        self.state = self.state.transition(event);

        Ok(RoundReport {
            attempt: self.attempts,
            guess,
            result,
            rejected,
            state: self.state,
        })
    }

    /// Render the final message; a win also plays the LED fanfare
    ///
    /// Does nothing while the game is still running.
    pub fn finish<D, L>(&self, display: &mut D, leds: &mut L) -> Result<(), DeviceError>
    where
        D: TextDisplay,
        L: Indicators,
    {
        let attempts: String<LINE_CAP> =
            format_line(format_args!("Attempts: {}", self.attempts));

        match self.outcome() {
            Some(Outcome::Won) => {
                display.print("SUCCESS!!", 0)?;
                display.print(&attempts, 1)?;
                leds.set(Indicator::Red, true)?;
                leds.blink(Indicator::Green, 3)?;
                leds.set(Indicator::Red, false)
            }
            Some(Outcome::Lost) => {
                display.print("GAME OVER", 0)?;
                display.print(&attempts, 1)
            }
            None => Ok(()),
        }
    }

    /// Collect one accepted digit per position
    fn read_guess<D, L, I>(
        &self,
        display: &mut D,
        leds: &mut L,
        input: &mut I,
    ) -> Result<(Sequence, u8), DeviceError>
    where
        D: TextDisplay,
        L: Indicators,
        I: DigitInput,
    {
        let mut guess = Sequence::new();
        let mut rejected: u8 = 0;

        for position in 0..self.config.seqlen as usize {
            let digit = loop {
                display.print("Go!", 0)?;
                let count = input.read_count()?;
                match self.config.check_digit(position, count) {
                    Ok(digit) => break digit,
                    Err(_) => {
                        rejected = rejected.saturating_add(1);
                        let hint: String<LINE_CAP> = format_line(format_args!(
                            "Please input a number from 1 to {}",
                            self.config.colors
                        ));
                        display.clear()?;
                        display.print(&hint, 0)?;
                        display.clear()?;
                    }
                }
            };

            display.clear()?;
            guess.push(digit);
            leds.blink(Indicator::Red, 1)?;

            let named: String<LINE_CAP> =
                format_line(format_args!("Guess: {}", color_name(digit)));
            display.print(&named, 0)?;
            leds.blink(Indicator::Green, digit)?;
            display.clear()?;
        }

        Ok((guess, rejected))
    }

    /// Show the score on both rows and as LED counts, then close the round
    fn show_score<D, L>(
        &self,
        display: &mut D,
        leds: &mut L,
        result: MatchResult,
    ) -> Result<(), DeviceError>
    where
        D: TextDisplay,
        L: Indicators,
    {
        let exact: String<LINE_CAP> = format_line(format_args!("{} exact", result.exact));
        let approximate: String<LINE_CAP> =
            format_line(format_args!("{} approximate", result.approximate));

        display.clear()?;
        display.print(&exact, 0)?;
        display.print(&approximate, 1)?;

        leds.blink(Indicator::Green, result.exact)?;
        leds.blink(Indicator::Red, 1)?;
        leds.blink(Indicator::Green, result.approximate)?;

        display.clear()?;
        display.print("Round finished", 0)?;
        leds.blink(Indicator::Red, 3)?;
        display.clear()
    }
}

/// Format into a fixed-capacity line, truncating on overflow
fn format_line<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut line = String::new();
    let _ = line.write_fmt(args);
    line
}
