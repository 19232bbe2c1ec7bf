//! Exposure error types.

use thiserror::Error;

use crate::controller::ExposureState;

/// Errors that can occur while exposing a secret.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// `expose` was called on a controller that is not idle.
    #[error("controller is {actual}, expected {expected}")]
    InvalidState {
        /// State the operation requires.
        expected: ExposureState,
        /// State the controller was in.
        actual: ExposureState,
    },

    /// The countdown task did not run to completion. The secret was still wiped.
    #[error("countdown task failed: {0}")]
    CountdownFailed(String),
}
