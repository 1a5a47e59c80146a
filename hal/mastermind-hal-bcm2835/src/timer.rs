//! Interval timer deadline
//!
//! A one-shot POSIX timer on `CLOCK_MONOTONIC` delivers `SIGALRM` when the
//! deadline passes. The signal handler raises the process-wide expiry
//! flag and does nothing else; the polling loop on the control thread
//! observes the flag through [`Deadline::is_expired`].

use std::time::Duration;

use log::{debug, error};
use nix::libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigEvent, SigHandler, SigSet, SigevNotify, Signal};
use nix::sys::time::TimeSpec;
use nix::sys::timer::{Expiration, Timer, TimerSetTimeFlags};
use nix::time::ClockId;
use portable_atomic::{AtomicBool, Ordering};

use mastermind_hal::{Deadline, ExpiryFlag};

use crate::error::HalError;

/// Written by the SIGALRM handler, read by the polling loop
static EXPIRED: ExpiryFlag = ExpiryFlag::new();

/// Set while an [`IntervalTimer`] owns the handler and the flag
static TIMER_TAKEN: AtomicBool = AtomicBool::new(false);

extern "C" fn on_alarm(_signal: c_int) {
    EXPIRED.raise();
}

/// Deadline backed by a monotonic POSIX timer and `SIGALRM`
pub struct IntervalTimer {
    timer: Timer,
    previous: SigAction,
}

impl IntervalTimer {
    /// Install the `SIGALRM` handler and create the timer
    ///
    /// Only one interval timer may exist at a time.
    pub fn new() -> Result<Self, HalError> {
        if TIMER_TAKEN
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(HalError::TimerInUse);
        }

        match Self::install() {
            Ok(timer) => Ok(timer),
            Err(e) => {
                TIMER_TAKEN.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    fn install() -> Result<Self, HalError> {
        EXPIRED.clear();

        // SA_RESTART keeps sleeps and stdin reads on the control thread
        // from failing with EINTR when the alarm lands mid-call
        let action = SigAction::new(
            SigHandler::Handler(on_alarm),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );
        // SAFETY: the handler performs a single atomic store, which is
        // async-signal-safe.
        let previous =
            unsafe { sigaction(Signal::SIGALRM, &action) }.map_err(HalError::Signal)?;

        let event = SigEvent::new(SigevNotify::SigevSignal {
            signal: Signal::SIGALRM,
            si_value: 0,
        });
        let timer = match Timer::new(ClockId::CLOCK_MONOTONIC, event) {
            Ok(timer) => timer,
            Err(e) => {
                // SAFETY: restoring the disposition we replaced above
                let _ = unsafe { sigaction(Signal::SIGALRM, &previous) };
                return Err(HalError::Timer(e));
            }
        };

        debug!("interval timer installed");
        Ok(Self { timer, previous })
    }

    /// Stop a pending expiry; a zero initial value disarms the timer
    fn disarm(&mut self) -> nix::Result<()> {
        self.timer.set(
            Expiration::OneShot(TimeSpec::new(0, 0)),
            TimerSetTimeFlags::empty(),
        )
    }
}

impl Deadline for IntervalTimer {
    fn arm(&mut self, timeout_us: u32) {
        EXPIRED.clear();

        // A zero expiration would disarm the timer instead of firing it
        if timeout_us == 0 {
            if let Err(e) = self.disarm() {
                error!("failed to disarm interval timer: {}", e);
            }
            EXPIRED.raise();
            return;
        }

        let expiration = Expiration::OneShot(TimeSpec::from_duration(Duration::from_micros(
            u64::from(timeout_us),
        )));
        if let Err(e) = self.timer.set(expiration, TimerSetTimeFlags::empty()) {
            // Never leave a polling loop waiting on a timer that will not fire
            error!("failed to arm interval timer: {}", e);
            EXPIRED.raise();
        }
    }

    fn is_expired(&self) -> bool {
        EXPIRED.is_raised()
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        // Disarm before restoring the old disposition: a SIGALRM landing
        // under SIG_DFL would terminate the process
        if let Err(e) = self.disarm() {
            error!("failed to disarm interval timer: {}", e);
        }
        // SAFETY: restoring the disposition that was active before new()
        let _ = unsafe { sigaction(Signal::SIGALRM, &self.previous) };
        TIMER_TAKEN.store(false, Ordering::Release);
    }
}
