//! Countdown task.
//!
//! The countdown runs as its own tokio task and publishes the remaining
//! seconds on a `watch` channel. It never sees the secret.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Interval between countdown ticks.
pub const TICK: Duration = Duration::from_secs(1);

/// How an exposure ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureOutcome {
    /// The full window elapsed.
    Elapsed,
    /// The exposure was cancelled before the window elapsed.
    Interrupted,
}

/// Countdown value published to display subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// No exposure has started yet.
    Pending,
    /// Seconds left before the secret is wiped.
    Remaining(u32),
    /// The secret has been wiped.
    Expired(ExposureOutcome),
}

impl Countdown {
    /// Seconds left, if an exposure is running.
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::Remaining(secs) => Some(*secs),
            Self::Pending | Self::Expired(_) => None,
        }
    }

    /// Returns true once the secret has been wiped.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}

/// Publishes `remaining` unless the exposure has already been marked expired.
fn publish(ticks: &watch::Sender<Countdown>, remaining: u32) -> bool {
    ticks.send_if_modified(|current| {
        if current.is_expired() {
            return false;
        }
        *current = Countdown::Remaining(remaining);
        true
    })
}

/// Counts down from `seconds`, one tick per [`TICK`], until zero or cancellation.
///
/// Stops early if another party has already published [`Countdown::Expired`].
pub(crate) async fn run(
    seconds: u32,
    ticks: Arc<watch::Sender<Countdown>>,
    token: CancellationToken,
) -> ExposureOutcome {
    for remaining in (1..=seconds).rev() {
        if !publish(&ticks, remaining) {
            return ExposureOutcome::Interrupted;
        }
        trace!(remaining, "Countdown tick");

        tokio::select! {
            biased;

            _ = token.cancelled() => return ExposureOutcome::Interrupted,
            _ = tokio::time::sleep(TICK) => {},
        }
    }

    if !publish(&ticks, 0) {
        return ExposureOutcome::Interrupted;
    }
    ExposureOutcome::Elapsed
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_run_elapses() {
        let (tx, rx) = watch::channel(Countdown::Pending);
        let started = tokio::time::Instant::now();

        let outcome = run(3, Arc::new(tx), CancellationToken::new()).await;

        assert_eq!(outcome, ExposureOutcome::Elapsed);
        assert_eq!(*rx.borrow(), Countdown::Remaining(0));
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_publishes_each_second() {
        let (tx, mut rx) = watch::channel(Countdown::Pending);
        let task = tokio::spawn(run(3, Arc::new(tx), CancellationToken::new()));

        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let value = *rx.borrow_and_update();
            seen.push(value);
            if value == Countdown::Remaining(0) {
                break;
            }
        }

        assert_eq!(task.await.unwrap(), ExposureOutcome::Elapsed);
        assert_eq!(
            seen,
            vec![
                Countdown::Remaining(3),
                Countdown::Remaining(2),
                Countdown::Remaining(1),
                Countdown::Remaining(0),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cancelled() {
        let (tx, _rx) = watch::channel(Countdown::Pending);
        let token = CancellationToken::new();
        token.cancel();

        let started = tokio::time::Instant::now();
        let outcome = run(60, Arc::new(tx), token).await;

        assert_eq!(outcome, ExposureOutcome::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_never_overwrites_expiry() {
        let (tx, rx) = watch::channel(Countdown::Expired(ExposureOutcome::Interrupted));

        let outcome = run(5, Arc::new(tx), CancellationToken::new()).await;

        assert_eq!(outcome, ExposureOutcome::Interrupted);
        assert_eq!(*rx.borrow(), Countdown::Expired(ExposureOutcome::Interrupted));
    }

    #[test]
    fn test_countdown_remaining() {
        assert_eq!(Countdown::Remaining(5).remaining(), Some(5));
        assert_eq!(Countdown::Pending.remaining(), None);
        assert!(Countdown::Expired(ExposureOutcome::Elapsed).is_expired());
    }
}
