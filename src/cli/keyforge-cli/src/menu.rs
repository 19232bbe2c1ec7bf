//! Interactive prompts: kind menu, exposure window, HMAC key.

use std::io::{self, BufRead, Write};

use keyforge_exposure::{Clamp, ExposureWindow};
use keyforge_keygen::KindName;
use zeroize::Zeroizing;

/// Invalid menu entries tolerated before giving up.
pub const MAX_ATTEMPTS: usize = 3;

/// Why a menu entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange,
}

/// Adjustment made to the requested exposure window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowNotice {
    NotANumber,
    Clamped(Clamp),
}

/// Parses a 1-based menu entry.
pub fn parse_choice(input: &str) -> Result<KindName, ChoiceError> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChoiceError::NotANumber);
    }

    input
        .parse::<usize>()
        .ok()
        .and_then(KindName::from_menu_index)
        .ok_or(ChoiceError::OutOfRange)
}

/// Parses the exposure window prompt. Empty input means the default.
pub fn parse_window(input: &str) -> (ExposureWindow, Option<WindowNotice>) {
    let input = input.trim();
    if input.is_empty() {
        return (ExposureWindow::default(), None);
    }

    match input.parse::<i64>() {
        Ok(requested) => {
            let (window, clamp) = ExposureWindow::resolve(requested);
            (window, clamp.map(WindowNotice::Clamped))
        },
        Err(_) => (ExposureWindow::default(), Some(WindowNotice::NotANumber)),
    }
}

/// Prints the kind menu.
pub fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "KeyForge - Secure Key Generator")?;
    for (i, kind) in KindName::ALL.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, kind.description())?;
    }
    Ok(())
}

/// Asks for a kind until a valid entry is given or `max_attempts` run out.
///
/// Returns `None` when attempts are exhausted or input ends.
pub fn select_kind<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    max_attempts: usize,
) -> io::Result<Option<KindName>> {
    let max = KindName::ALL.len();

    for attempt in 1..=max_attempts {
        write!(out, "Enter choice (1-{max}): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }

        match parse_choice(&line) {
            Ok(kind) => return Ok(Some(kind)),
            Err(ChoiceError::NotANumber) => {
                writeln!(out, "Invalid input! Please enter a number only.")?
            },
            Err(ChoiceError::OutOfRange) => writeln!(
                out,
                "Invalid choice! Please enter a number between 1 and {max}."
            )?,
        }

        let left = max_attempts - attempt;
        if left > 0 {
            writeln!(out, "You have {left} attempt(s) left.")?;
            writeln!(out)?;
        }
    }

    writeln!(out, "Too many invalid attempts. Exiting!")?;
    Ok(None)
}

/// Explains a window adjustment to the operator.
pub fn describe_notice(notice: WindowNotice) -> String {
    match notice {
        WindowNotice::NotANumber => format!(
            "Invalid input! Using default {} seconds.",
            ExposureWindow::DEFAULT_SECS
        ),
        WindowNotice::Clamped(Clamp::BelowMinimum) => format!(
            "Time must be at least {} second! Defaulting to {} seconds.",
            ExposureWindow::MIN_SECS,
            ExposureWindow::DEFAULT_SECS
        ),
        WindowNotice::Clamped(Clamp::AboveMaximum) => format!(
            "Maximum allowed time is {0} seconds. Using {0} seconds.",
            ExposureWindow::MAX_SECS
        ),
    }
}

/// Asks how long the key should stay on screen.
pub fn prompt_window<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<ExposureWindow> {
    write!(
        out,
        "Enter how long you need to copy the key (max {} seconds, default {}): ",
        ExposureWindow::MAX_SECS,
        ExposureWindow::DEFAULT_SECS
    )?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let (window, notice) = parse_window(&line);
    if let Some(notice) = notice {
        writeln!(out, "{}", describe_notice(notice))?;
    }
    Ok(window)
}

/// Reads an HMAC key from the operator.
///
/// The key is echoed by the terminal; it is held in a zeroizing buffer here.
pub fn prompt_hmac_key<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<Zeroizing<String>> {
    writeln!(
        out,
        "Note: HMAC keys are deterministic. The same input key always yields the same output."
    )?;
    write!(out, "Enter HMAC key: ")?;
    out.flush()?;

    let mut line = Zeroizing::new(String::new());
    input.read_line(&mut line)?;

    let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed_len);
    Ok(line)
}
