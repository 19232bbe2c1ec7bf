//! # KeyForge Exposure
//!
//! Time-bounded display of a generated secret, with wipe-on-expiry.
//!
//! An [`ExposureController`] takes ownership of a [`GeneratedSecret`], lends it
//! once to a display callback, runs a countdown task, and overwrites the secret
//! before returning.
//!
//! ## Limits of the wipe
//!
//! The wipe is best-effort. It overwrites and zeroizes the one buffer the
//! controller owns. It cannot reach copies made by the terminal, the clipboard,
//! stdout buffering, or pages the OS swapped to disk. The compiler may also
//! elide the filler write, since the buffer is dropped right after it; only
//! the zeroize-on-drop pass uses volatile writes that cannot be optimized out.
//!
//! [`GeneratedSecret`]: keyforge_keygen::GeneratedSecret

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod controller;
pub mod countdown;
pub mod error;
pub mod window;

pub use controller::{
    ExposureCanceller, ExposureController, ExposureReport, ExposureState, WipeReceipt,
};
pub use countdown::{Countdown, ExposureOutcome};
pub use error::ExposureError;
pub use window::{Clamp, ExposureWindow};
