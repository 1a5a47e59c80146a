//! Hardware acquisition errors

use std::io;

use thiserror::Error;

/// Failures while acquiring the board's hardware resources
///
/// Every variant means the hardware is unavailable; none of them can
/// happen once acquisition succeeded.
#[derive(Debug, Error)]
pub enum HalError {
    /// The memory device could not be opened (usually missing privilege)
    #[error("unable to open {path}: {source}")]
    Open {
        path: &'static str,
        #[source]
        source: io::Error,
    },

    /// The register block could not be mapped
    #[error("mmap of GPIO block at {base:#010x} failed: {source}")]
    Map {
        base: u64,
        #[source]
        source: io::Error,
    },

    /// A mapping is already live in this process
    #[error("GPIO register block is already mapped")]
    AlreadyMapped,

    /// An interval timer already owns the expiry flag
    #[error("interval timer is already in use")]
    TimerInUse,

    /// Installing the SIGALRM handler failed
    #[error("unable to install SIGALRM handler: {0}")]
    Signal(#[source] nix::Error),

    /// Creating the POSIX timer failed
    #[error("unable to create interval timer: {0}")]
    Timer(#[source] nix::Error),
}
