//! Integration tests for KeyForge.
//!
//! These tests drive the complete workflow across crates: pick a kind,
//! generate a key, expose it through a controller, and check the wipe.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use keyforge_exposure::{Countdown, ExposureController, ExposureReport, ExposureWindow};
use keyforge_keygen::{generate_key, KeyKind};
use tokio::task::JoinHandle;

// ============================================================================
// Test Harness
// ============================================================================

/// Everything observed during one exposure.
pub struct ExposureRun {
    /// Text handed to the reveal callback.
    pub revealed: String,
    /// Countdown values seen by a display subscriber, in order.
    pub ticks: Vec<Countdown>,
    /// Controller's report.
    pub report: ExposureReport,
}

/// Records every countdown value until expiry.
fn record_ticks(controller: &ExposureController) -> JoinHandle<Vec<Countdown>> {
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while rx.changed().await.is_ok() {
            let value = *rx.borrow_and_update();
            seen.push(value);
            if value.is_expired() {
                break;
            }
        }
        seen
    })
}

/// Generates a key of `kind` and exposes it for `seconds` on a fresh controller.
pub async fn generate_and_expose(kind: &KeyKind, seconds: i64) -> Result<ExposureRun> {
    let secret = generate_key(kind).context("Key generation failed")?;
    let controller = ExposureController::new();
    let recorder = record_ticks(&controller);

    let revealed = Arc::new(Mutex::new(String::new()));
    let sink = revealed.clone();

    let report = controller
        .expose(secret, ExposureWindow::clamped(seconds), move |key| {
            if let Ok(mut s) = sink.lock() {
                s.push_str(key);
            }
        })
        .await
        .context("Exposure failed")?;

    let ticks = recorder.await.context("Tick recorder failed")?;
    let revealed = revealed
        .lock()
        .map(|s| s.clone())
        .map_err(|_| anyhow::anyhow!("reveal buffer poisoned"))?;

    Ok(ExposureRun {
        revealed,
        ticks,
        report,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use keyforge_exposure::{ExposureError, ExposureOutcome, ExposureState};
    use keyforge_keygen::{KindName, WIPE_FILLER};
    use zeroize::Zeroizing;

    #[tokio::test(start_paused = true)]
    async fn test_every_kind_generates_and_wipes() {
        for name in KindName::ALL {
            let key = (name == KindName::Hmac).then(|| Zeroizing::new("k".to_string()));
            let kind = KeyKind::from_parts(name, None, key).unwrap();

            let run = generate_and_expose(&kind, 1).await.unwrap();

            assert!(!run.revealed.is_empty(), "{name} revealed nothing");
            assert_eq!(run.report.outcome, ExposureOutcome::Elapsed, "{name}");
            assert_eq!(run.report.wipe.len, run.revealed.len(), "{name}");
            assert!(run.report.wipe.verified, "{name}");
            assert!(!run.revealed.bytes().all(|b| b == WIPE_FILLER), "{name}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_stream_ends_with_expiry() {
        let run = generate_and_expose(&KeyKind::Numeric(6), 3).await.unwrap();

        assert_eq!(run.revealed.len(), 6);
        assert_eq!(
            run.ticks[..3],
            [
                Countdown::Remaining(3),
                Countdown::Remaining(2),
                Countdown::Remaining(1),
            ]
        );
        // The final zero tick may be superseded by expiry before the subscriber reads it.
        assert_eq!(
            run.ticks.last(),
            Some(&Countdown::Expired(ExposureOutcome::Elapsed))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_window_clamps() {
        let run = generate_and_expose(&KeyKind::UuidLike, 0).await.unwrap();
        assert!(run.report.elapsed >= Duration::from_secs(20));
        assert!(run.report.elapsed < Duration::from_secs(21));

        let run = generate_and_expose(&KeyKind::UuidLike, 500).await.unwrap();
        assert!(run.report.elapsed >= Duration::from_secs(60));
        assert!(run.report.elapsed < Duration::from_secs(61));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_cancel_from_another_task() {
        let controller = Arc::new(ExposureController::new());
        let canceller = controller.canceller();
        let secret = generate_key(&KeyKind::RandomAlphanumeric(24)).unwrap();

        let exposure = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .expose(secret, ExposureWindow::clamped(60), |_| {})
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(controller.state(), ExposureState::Exposed);
        assert!(controller.remaining().is_some());

        canceller.cancel();
        let report = tokio::time::timeout(Duration::from_secs(5), exposure)
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        assert_eq!(report.outcome, ExposureOutcome::Interrupted);
        assert_eq!(report.wipe.len, 24);
        assert!(report.wipe.verified);
        assert_eq!(controller.state(), ExposureState::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reuse_after_expiry_rejected() {
        let controller = ExposureController::new();
        let window = ExposureWindow::clamped(1);

        let first = generate_key(&KeyKind::Hex(16)).unwrap();
        controller.expose(first, window, |_| {}).await.unwrap();

        let second = generate_key(&KeyKind::Hex(16)).unwrap();
        let result = controller.expose(second, window, |_| {}).await;

        assert!(matches!(result, Err(ExposureError::InvalidState { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hmac_workflow_is_reproducible() {
        let kind = KeyKind::HmacDerived(Zeroizing::new("operator key".to_string()));

        let a = generate_and_expose(&kind, 1).await.unwrap();
        let b = generate_and_expose(&kind, 1).await.unwrap();

        assert_eq!(a.revealed, b.revealed);
        assert_eq!(a.revealed.len(), 64);
    }

    #[tokio::test]
    async fn test_invalid_parameters_never_reach_controller() {
        let result = generate_and_expose(&KeyKind::Base64(0), 1).await;
        let err = result.err().unwrap();
        assert!(format!("{err:#}").contains("length"));
    }
}
