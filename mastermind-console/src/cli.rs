//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

/// Mastermind on a Raspberry Pi button, two LEDs and an HD44780 LCD
#[derive(Debug, Parser)]
#[command(name = "mastermind", version)]
pub struct Args {
    /// Print the effective settings before starting
    #[arg(short, long)]
    pub verbose: bool,

    /// Reveal the secret and print every guess and answer
    #[arg(short, long)]
    pub debug: bool,

    /// Score SEQ1 against SEQ2 and exit without touching the hardware
    #[arg(short, long, num_args = 2, value_names = ["SEQ1", "SEQ2"])]
    pub unit_test: Option<Vec<u32>>,

    /// Use a fixed secret instead of a random one (e.g. 312)
    #[arg(short, long)]
    pub secret: Option<u32>,

    /// Configuration file replacing the built-in one
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// The two unit-test sequences, when given
    pub fn unit_test_pair(&self) -> Option<(u32, u32)> {
        match self.unit_test.as_deref() {
            Some(&[a, b]) => Some((a, b)),
            _ => None,
        }
    }
}
