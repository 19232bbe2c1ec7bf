//! Console output for an exposure: the key banner, the live countdown line,
//! and the terminal clear once the key is gone.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use keyforge_exposure::{Countdown, ExposureOutcome};
use tokio::sync::watch;

/// Prints the key with a copy-now warning.
pub fn reveal<W: Write>(out: &mut W, key: &str, seconds: u32) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Generated Key (copy it now! It will be destroyed soon):")?;
    writeln!(out)?;
    writeln!(out, "  {key}")?;
    writeln!(out)?;
    writeln!(
        out,
        "WARNING: You have {seconds} seconds to copy the key before it is erased."
    )?;
    writeln!(out, "Press Ctrl-C to erase it now.")?;
    out.flush()
}

/// Renders one countdown value. Returns `None` for values that print nothing.
pub fn countdown_line(value: Countdown) -> Option<String> {
    match value {
        Countdown::Pending => None,
        Countdown::Remaining(secs) => Some(format!("\rTime remaining: {secs:>2} seconds... ")),
        Countdown::Expired(ExposureOutcome::Elapsed) => {
            Some("\rTime expired! Key has been destroyed.   \n".to_string())
        },
        Countdown::Expired(ExposureOutcome::Interrupted) => {
            Some("\rExposure interrupted! Key has been destroyed.\n".to_string())
        },
    }
}

/// Follows the countdown and rewrites a single status line until expiry.
pub async fn follow_countdown<W: Write>(
    mut ticks: watch::Receiver<Countdown>,
    mut out: W,
) -> io::Result<()> {
    loop {
        let value = *ticks.borrow_and_update();
        if let Some(line) = countdown_line(value) {
            write!(out, "{line}")?;
            out.flush()?;
        }
        if value.is_expired() {
            return Ok(());
        }
        if ticks.changed().await.is_err() {
            // Controller dropped without publishing expiry.
            writeln!(out)?;
            return out.flush();
        }
    }
}

/// Clears the visible screen and the scrollback buffer.
pub fn clear_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_contains_key() {
        let mut out = Vec::new();
        reveal(&mut out, "ABC123", 20).unwrap();
        let printed = String::from_utf8(out).unwrap();

        assert!(printed.contains("  ABC123\n"));
        assert!(printed.contains("You have 20 seconds"));
    }

    #[test]
    fn test_countdown_lines() {
        assert_eq!(countdown_line(Countdown::Pending), None);
        assert_eq!(
            countdown_line(Countdown::Remaining(7)).unwrap(),
            "\rTime remaining:  7 seconds... "
        );
        assert!(countdown_line(Countdown::Expired(ExposureOutcome::Elapsed))
            .unwrap()
            .contains("Time expired!"));
    }

    #[tokio::test]
    async fn test_follow_countdown_until_expired() {
        let (tx, rx) = watch::channel(Countdown::Pending);

        let follower = tokio::spawn(follow_countdown(rx, Vec::new()));
        tx.send_replace(Countdown::Remaining(2));
        tokio::task::yield_now().await;
        tx.send_replace(Countdown::Expired(ExposureOutcome::Interrupted));

        follower.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_follow_countdown_sender_dropped() {
        let (tx, rx) = watch::channel(Countdown::Remaining(3));
        drop(tx);

        follow_countdown(rx, Vec::new()).await.unwrap();
    }

    #[test]
    fn test_clear_terminal_emits_escape_codes() {
        let mut out = Vec::new();
        clear_terminal(&mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("\x1b[2J"));
        assert!(printed.contains("\x1b[3J"));
    }
}
