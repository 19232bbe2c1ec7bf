//! KeyForge CLI - Generate a key, show it briefly, then wipe it.

mod display;
mod menu;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use keyforge_exposure::{ExposureController, ExposureOutcome, ExposureWindow};
use keyforge_keygen::{catalog, generate_key, KeyKind, KindName};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zeroize::Zeroizing;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "keyforge")]
#[command(about = "KeyForge - Generate a secret key, show it for a moment, then wipe it")]
#[command(version)]
struct Cli {
    /// Log filter, e.g. `debug` (defaults to RUST_LOG, then `warn`)
    #[arg(long, global = true, env = "KEYFORGE_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key and display it for a limited time (default)
    Generate(GenerateArgs),
    /// List supported key kinds
    Kinds {
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    /// Key kind; skips the interactive menu
    #[arg(long, env = "KEYFORGE_KIND")]
    kind: Option<KindName>,

    /// Key length in characters (random bytes for base64)
    #[arg(long, conflicts_with = "words")]
    length: Option<usize>,

    /// Number of passphrase words
    #[arg(long)]
    words: Option<usize>,

    /// HMAC key (prompted if absent; prefer the env var or the prompt over the flag)
    #[arg(long, env = "KEYFORGE_HMAC_KEY", hide_env_values = true)]
    hmac_key: Option<String>,

    /// Seconds to display the key (1-60, default 20)
    #[arg(long, env = "KEYFORGE_DISPLAY_SECONDS", allow_negative_numbers = true)]
    seconds: Option<i64>,

    /// Keep the terminal contents after the key is wiped
    #[arg(long)]
    no_clear: bool,
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_kinds(format: &str) -> Result<()> {
    let kinds = catalog();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&kinds)?);
        },
        "text" => {
            println!("Key kinds:");
            for info in &kinds {
                let entropy = match info.entropy_bits {
                    Some(bits) => format!("~{bits:.0} bits"),
                    None => "depends on input key".to_string(),
                };
                let default = info
                    .default_param
                    .map(|p| format!(" (default {p})"))
                    .unwrap_or_default();
                println!(
                    "  {}. {:<13} {}{}, {}",
                    info.index,
                    info.name.to_string(),
                    info.description,
                    default,
                    entropy
                );
            }
        },
        _ => bail!("Unknown format: {}. Use 'text' or 'json'", format),
    }

    Ok(())
}

async fn cmd_generate(args: GenerateArgs) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    let interactive = args.kind.is_none();

    let name = match args.kind {
        Some(name) => name,
        None => {
            menu::print_menu(&mut stdout)?;
            match menu::select_kind(&mut input, &mut stdout, menu::MAX_ATTEMPTS)? {
                Some(name) => name,
                None => return Ok(ExitCode::FAILURE),
            }
        },
    };

    let window = match args.seconds {
        Some(requested) => {
            let (window, clamp) = ExposureWindow::resolve(requested);
            if let Some(clamp) = clamp {
                println!("{}", menu::describe_notice(menu::WindowNotice::Clamped(clamp)));
            }
            window
        },
        None if interactive => menu::prompt_window(&mut input, &mut stdout)?,
        None => ExposureWindow::default(),
    };

    let hmac_key = match (name, args.hmac_key) {
        (KindName::Hmac, Some(key)) => Some(Zeroizing::new(key)),
        (KindName::Hmac, None) => Some(menu::prompt_hmac_key(&mut input, &mut stdout)?),
        _ => None,
    };
    drop(input);

    let kind = KeyKind::from_parts(name, args.length.or(args.words), hmac_key)
        .context("Invalid key parameters")?;

    tracing::info!(kind = %kind, seconds = window.seconds(), "Generating key");

    let secret = generate_key(&kind).context("Key generation failed")?;
    drop(kind);

    let controller = ExposureController::new();

    let canceller = controller.canceller();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let mut revealed = Ok(());
    let follower = tokio::spawn(display::follow_countdown(
        controller.subscribe(),
        io::stdout(),
    ));

    let report = controller
        .expose(secret, window, |key| {
            revealed = display::reveal(&mut io::stdout(), key, window.seconds());
        })
        .await
        .context("Key exposure failed")?;

    interrupt.abort();
    follower
        .await
        .context("Countdown display task failed")?
        .context("Failed to write countdown")?;
    revealed.context("Failed to display key")?;

    if !report.wipe.verified {
        bail!("Key overwrite could not be verified");
    }

    if !args.no_clear {
        display::clear_terminal(&mut stdout).context("Failed to clear terminal")?;
    }

    match report.outcome {
        ExposureOutcome::Elapsed => println!("Key erased."),
        ExposureOutcome::Interrupted => println!("Cancelled. Key erased early."),
    }
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Main
// ============================================================================

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match cli.command {
        Some(Commands::Kinds { format }) => cmd_kinds(&format).map(|()| ExitCode::SUCCESS),
        Some(Commands::Generate(args)) => cmd_generate(args).await,
        None => cmd_generate(GenerateArgs::default()).await,
    }
}
