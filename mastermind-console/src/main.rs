//! Mastermind console
//!
//! Plays one game of Mastermind on a Raspberry Pi: guesses are entered by
//! pressing a button once per colour code, answers are blinked on a green
//! and a red LED and echoed on an HD44780 LCD.
//!
//! With `--unit-test SEQ1 SEQ2` it only scores two sequences on stdout and
//! never touches the hardware.

mod board;
mod cli;
mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use mastermind_core::traits::{DigitInput, Indicators, TextDisplay};
use mastermind_core::{score_encoded, GameSession, Outcome, RoundReport};
use mastermind_hal::Gpio;
use mastermind_hal_bcm2835::{GpioMap, IntervalTimer, PeripheralBase, SleepDelay};

use cli::Args;
use config::ConsoleConfig;
use error::ConsoleError;

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.debug || args.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ConsoleError> {
    let config = ConsoleConfig::load(args.config.as_deref())?;

    if args.verbose {
        print_settings(args, &config);
    }

    if let Some((secret, guess)) = args.unit_test_pair() {
        return unit_test(secret, guess, &config, args.verbose);
    }

    let mut rng = SmallRng::from_entropy();
    let mut session = GameSession::start(config.game, args.secret, &mut rng)?;
    info!(
        "secret established: {} pegs over {} colors{}",
        config.game.seqlen,
        config.game.colors,
        if args.secret.is_some() { " (preset)" } else { "" }
    );

    println!(
        "Raspberry Pi LCD driver, for a {}x{} display ({}-bit wiring)",
        config.lcd.cols, config.lcd.rows, config.lcd.bits
    );

    let base = PeripheralBase(config.board.gpio_base);
    let gpio = Gpio::new(GpioMap::acquire(base)?);
    let timer = IntervalTimer::new()?;

    let mut console = board::wire(&gpio, &config, SleepDelay, timer)?;
    let outcome = play(
        &mut session,
        &mut console.lcd,
        &mut console.leds,
        &mut console.keypad,
        args.debug,
    )?;

    match outcome {
        Outcome::Won => println!("Sequence found"),
        Outcome::Lost => println!("Sequence not found"),
    }
    info!(
        "game over after {} attempts: {:?}",
        session.attempts(),
        outcome
    );
    Ok(())
}

/// Drive one session from the welcome banner to the final message
fn play<D, L, I>(
    session: &mut GameSession,
    display: &mut D,
    leds: &mut L,
    input: &mut I,
    reveal: bool,
) -> Result<Outcome, ConsoleError>
where
    D: TextDisplay,
    L: Indicators,
    I: DigitInput,
{
    session.welcome(display)?;
    if reveal {
        println!("Secret: {}", session.secret().initials());
    }

    wait_for_enter()?;
    display.clear()?;

    while !session.is_over() {
        let report = session.play_round(display, leds, input)?;
        if report.rejected > 0 {
            warn!(
                "round {}: {} out-of-range counts ignored",
                report.attempt, report.rejected
            );
        }
        info!(
            "round {}: guess {} scored {} exact, {} approximate",
            report.attempt, report.guess, report.result.exact, report.result.approximate
        );
        if reveal {
            let (guess, answer) = round_lines(&report);
            println!("{}", guess);
            println!("{}", answer);
        }
    }

    session.finish(display, leds)?;

    // A finished session always has an outcome
    Ok(session.outcome().unwrap_or(Outcome::Lost))
}

/// Debug-mode lines for one round: the guess in colour initials, then
/// the exact and approximate counts
fn round_lines(report: &RoundReport) -> (String, String) {
    (
        format!("Guess{}: {}", report.attempt, report.guess.initials()),
        format!(
            "Answer{}: {}{}",
            report.attempt, report.result.exact, report.result.approximate
        ),
    )
}

/// Score two encoded sequences and print the counts
fn unit_test(
    secret: u32,
    guess: u32,
    config: &ConsoleConfig,
    verbose: bool,
) -> Result<(), ConsoleError> {
    if verbose {
        println!("Testing matches function with sequences {} and {}", secret, guess);
    }
    let result = score_encoded(secret, guess, &config.game)?;
    println!("{} exact", result.exact);
    println!("{} approximate", result.approximate);
    Ok(())
}

fn print_settings(args: &Args, config: &ConsoleConfig) {
    let on_off = |flag: bool| if flag { "ON" } else { "OFF" };

    println!("Settings for running the program");
    println!("Verbose is {}", on_off(args.verbose));
    println!("Debug is {}", on_off(args.debug));
    println!("Unittest is {}", on_off(args.unit_test.is_some()));
    if let Some(secret) = args.secret {
        println!("Secret sequence set to {}", secret);
    }
    println!(
        "{} colors, sequence of {}, {} attempts",
        config.game.colors, config.game.seqlen, config.game.max_attempts
    );
}

/// Block until the operator presses ENTER
fn wait_for_enter() -> Result<(), ConsoleError> {
    print!("Press ENTER to continue: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
