//! Exposure window: how long a secret stays on screen.

use std::time::Duration;

/// Duration, in whole seconds, that a secret remains exposed.
///
/// Always within `[MIN_SECS, MAX_SECS]`. Out-of-range requests are clamped
/// rather than rejected: below the minimum falls back to the default, above
/// the maximum is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExposureWindow {
    seconds: u32,
}

/// How a requested window was adjusted to fit the allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    /// Request was below the minimum; the default was used.
    BelowMinimum,
    /// Request was above the maximum; the maximum was used.
    AboveMaximum,
}

impl ExposureWindow {
    /// Shortest allowed window.
    pub const MIN_SECS: u32 = 1;
    /// Longest allowed window.
    pub const MAX_SECS: u32 = 60;
    /// Window used when none (or too short a one) is requested.
    pub const DEFAULT_SECS: u32 = 20;

    /// Creates a window, returning `None` if `seconds` is out of range.
    pub fn new(seconds: u32) -> Option<Self> {
        (Self::MIN_SECS..=Self::MAX_SECS)
            .contains(&seconds)
            .then_some(Self { seconds })
    }

    /// Creates a window from any requested value, clamping it into range.
    pub fn clamped(requested: i64) -> Self {
        Self::resolve(requested).0
    }

    /// Clamps `requested` into range and reports whether it was adjusted.
    pub fn resolve(requested: i64) -> (Self, Option<Clamp>) {
        if requested < i64::from(Self::MIN_SECS) {
            (Self::default(), Some(Clamp::BelowMinimum))
        } else if requested > i64::from(Self::MAX_SECS) {
            (
                Self {
                    seconds: Self::MAX_SECS,
                },
                Some(Clamp::AboveMaximum),
            )
        } else {
            // In range, so the narrowing cannot truncate.
            (
                Self {
                    seconds: requested as u32,
                },
                None,
            )
        }
    }

    /// Window length in seconds.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Window length as a `Duration`.
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.seconds))
    }
}

impl Default for ExposureWindow {
    fn default() -> Self {
        Self {
            seconds: Self::DEFAULT_SECS,
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_clamps_to_default() {
        assert_eq!(ExposureWindow::clamped(0).seconds(), 20);
        assert_eq!(
            ExposureWindow::resolve(0),
            (ExposureWindow::default(), Some(Clamp::BelowMinimum))
        );
    }

    #[test]
    fn test_negative_clamps_to_default() {
        assert_eq!(ExposureWindow::clamped(-5).seconds(), 20);
    }

    #[test]
    fn test_large_clamps_to_max() {
        assert_eq!(ExposureWindow::clamped(500).seconds(), 60);
        assert_eq!(ExposureWindow::resolve(61).1, Some(Clamp::AboveMaximum));
    }

    #[test]
    fn test_bounds_are_kept() {
        assert_eq!(ExposureWindow::resolve(1), (ExposureWindow::new(1).unwrap(), None));
        assert_eq!(ExposureWindow::resolve(60), (ExposureWindow::new(60).unwrap(), None));
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(ExposureWindow::new(0).is_none());
        assert!(ExposureWindow::new(61).is_none());
        assert_eq!(ExposureWindow::new(30).unwrap().as_duration(), Duration::from_secs(30));
    }
}
