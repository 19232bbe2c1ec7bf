//! Exposure controller.
//!
//! The controller has three states:
//! - **Idle**: no secret has been handed over yet
//! - **Exposed**: a secret is on screen and the countdown is running
//! - **Expired**: the secret has been overwritten and released
//!
//! Transitions only move forward. A controller exposes exactly one secret;
//! create a new one for the next secret.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use keyforge_keygen::GeneratedSecret;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::countdown::{self, Countdown, ExposureOutcome};
use crate::error::ExposureError;
use crate::window::ExposureWindow;

/// Lifecycle state of an exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExposureState {
    /// Waiting for a secret.
    Idle = 0,
    /// Secret is exposed and the countdown is running.
    Exposed = 1,
    /// Secret has been wiped.
    Expired = 2,
}

impl ExposureState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Exposed,
            _ => Self::Expired,
        }
    }
}

impl std::fmt::Display for ExposureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Exposed => write!(f, "exposed"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// Evidence that a secret was overwritten before release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WipeReceipt {
    /// Number of bytes overwritten.
    pub len: usize,
    /// Whether every byte read back as the filler after overwriting.
    pub verified: bool,
}

/// Result of a completed exposure.
#[derive(Debug, Clone, Copy)]
pub struct ExposureReport {
    /// Whether the window elapsed or was cancelled.
    pub outcome: ExposureOutcome,
    /// Wipe evidence.
    pub wipe: WipeReceipt,
    /// Time between exposure and wipe.
    pub elapsed: Duration,
}

/// Handle for cancelling an exposure from another task or a signal handler.
#[derive(Debug, Clone)]
pub struct ExposureCanceller {
    token: CancellationToken,
}

impl ExposureCanceller {
    /// Ends the exposure early. The secret goes through the normal wipe path.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Owns one secret's visible lifetime and wipes it on expiry.
#[derive(Debug)]
pub struct ExposureController {
    state: AtomicU8,
    token: CancellationToken,
    ticks: Arc<watch::Sender<Countdown>>,
}

impl Default for ExposureController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExposureController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        let (ticks, _) = watch::channel(Countdown::Pending);
        Self {
            state: AtomicU8::new(ExposureState::Idle as u8),
            token: CancellationToken::new(),
            ticks: Arc::new(ticks),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> ExposureState {
        ExposureState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Subscribes to countdown updates for display.
    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.ticks.subscribe()
    }

    /// Seconds left in the running exposure, if any.
    pub fn remaining(&self) -> Option<u32> {
        self.ticks.borrow().remaining()
    }

    /// Returns a handle that can cancel the exposure from elsewhere.
    ///
    /// Cancelling before [`expose`](Self::expose) is called makes the exposure
    /// end (and wipe) as soon as it starts.
    pub fn canceller(&self) -> ExposureCanceller {
        ExposureCanceller {
            token: self.token.clone(),
        }
    }

    /// Cancels the exposure. Same as [`ExposureCanceller::cancel`].
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Exposes `secret` for `window`, then wipes it.
    ///
    /// `reveal` is called once with the secret text; the borrow cannot outlive
    /// the call. The countdown runs as a separate task. This future resolves
    /// only after the countdown has finished (or been cancelled) and the secret
    /// has been overwritten and dropped.
    ///
    /// If this future is dropped before it resolves, or `reveal` panics, the
    /// secret still goes through the same overwrite, the controller moves to
    /// `Expired`, subscribers see `Expired(Interrupted)`, and the countdown
    /// task is cancelled. No report is returned in that case.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the controller is not idle. The secret is wiped.
    /// - `CountdownFailed` if the countdown task panicked. The secret is wiped.
    pub async fn expose<F>(
        &self,
        mut secret: GeneratedSecret,
        window: ExposureWindow,
        reveal: F,
    ) -> Result<ExposureReport, ExposureError>
    where
        F: FnOnce(&str),
    {
        if let Err(actual) = self.state.compare_exchange(
            ExposureState::Idle as u8,
            ExposureState::Exposed as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            wipe(&mut secret);
            return Err(ExposureError::InvalidState {
                expected: ExposureState::Idle,
                actual: ExposureState::from_u8(actual),
            });
        }

        info!(seconds = window.seconds(), len = secret.len(), "Secret exposed");

        let started = Instant::now();
        let exposure = ExposureGuard::new(self, secret);

        reveal(exposure.secret.expose_secret());

        let countdown = tokio::spawn(countdown::run(
            window.seconds(),
            self.ticks.clone(),
            self.token.clone(),
        ));
        let joined = countdown.await;

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                exposure.finish(ExposureOutcome::Interrupted);
                error!(error = %e, "Countdown task failed, secret wiped");
                return Err(ExposureError::CountdownFailed(e.to_string()));
            },
        };

        let receipt = exposure.finish(outcome);

        let elapsed = started.elapsed();
        info!(?outcome, ?elapsed, "Exposure ended, secret wiped");

        Ok(ExposureReport {
            outcome,
            wipe: receipt,
            elapsed,
        })
    }
}

/// Holds the secret while the controller is `Exposed`.
///
/// Leaving the exposed state always goes through [`release`](Self::release),
/// either from [`finish`](Self::finish) or from `Drop` when the exposure is
/// abandoned.
struct ExposureGuard<'a> {
    controller: &'a ExposureController,
    secret: GeneratedSecret,
    armed: bool,
}

impl<'a> ExposureGuard<'a> {
    fn new(controller: &'a ExposureController, secret: GeneratedSecret) -> Self {
        Self {
            controller,
            secret,
            armed: true,
        }
    }

    /// Ends the exposure with `outcome` and drops the overwritten secret.
    fn finish(mut self, outcome: ExposureOutcome) -> WipeReceipt {
        self.release(outcome)
    }

    fn release(&mut self, outcome: ExposureOutcome) -> WipeReceipt {
        self.armed = false;
        self.controller.token.cancel();

        let receipt = wipe(&mut self.secret);

        self.controller
            .state
            .store(ExposureState::Expired as u8, Ordering::SeqCst);
        self.controller.ticks.send_replace(Countdown::Expired(outcome));

        receipt
    }
}

impl Drop for ExposureGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("Exposure abandoned before expiry, wiping secret");
            self.release(ExposureOutcome::Interrupted);
        }
    }
}

/// Overwrites the secret with filler and checks the result.
///
/// The buffer is zeroized again when the secret is dropped. Neither step can
/// reach copies made outside the buffer (terminal scrollback, swap, or
/// formatting buffers used by the reveal callback).
fn wipe(secret: &mut GeneratedSecret) -> WipeReceipt {
    secret.wipe();
    let receipt = WipeReceipt {
        len: secret.len(),
        verified: secret.is_wiped(),
    };

    if !receipt.verified {
        error!(len = receipt.len, "Secret overwrite could not be verified");
    } else {
        debug!(len = receipt.len, "Secret overwritten");
    }

    receipt
}
