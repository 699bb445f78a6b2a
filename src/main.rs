use std::{path::PathBuf, process::ExitCode};

use chara_card::{ParseReport, ScanOptions, Scanner};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints the character card JSON stored in PNG files.
#[derive(Parser, Debug)]
#[command(name = "chara-dump", version, long_about = None)]
struct Cli {
  /// Text chunk keyword to look for (anything containing "chara" also matches)
  #[arg(short, long, default_value = "chara")]
  identifier: String,

  /// Give up on files where the card isn't within this many bytes
  #[arg(long)]
  max_bytes: Option<usize>,

  /// Pretty print the JSON
  #[arg(short, long)]
  pretty: bool,

  /// Print a full report object per file instead of just the card
  #[arg(short, long)]
  report: bool,

  /// PNG files to read
  #[arg(required = true)]
  files: Vec<PathBuf>,
}

fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "chara_card=warn".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();
  match run(&cli) {
    Ok(0) => ExitCode::SUCCESS,
    Ok(_) => ExitCode::FAILURE,
    Err(e) => {
      eprintln!("error: {e:#}");
      ExitCode::FAILURE
    }
  }
}

/// Returns how many files couldn't be read or had no card.
fn run(cli: &Cli) -> anyhow::Result<usize> {
  let scanner = Scanner::new(ScanOptions::default().with_max_scan_bytes(cli.max_bytes));
  let mut failures = 0;
  for path in &cli.files {
    let bytes = match std::fs::read(path) {
      Ok(bytes) => bytes,
      Err(e) => {
        eprintln!("{}: {e}", path.display());
        failures += 1;
        continue;
      }
    };
    tracing::info!(path = %path.display(), len = bytes.len(), "scanning");
    let result = scanner.scan(&bytes, &cli.identifier);
    if result.is_err() {
      failures += 1;
    }
    if cli.report {
      let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
      print_json(&ParseReport::new(name, result), cli.pretty)?;
    } else {
      match result {
        Ok(card) => print_json(&card, cli.pretty)?,
        Err(e) => eprintln!("{}: {e}", path.display()),
      }
    }
  }
  Ok(failures)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
  let s =
    if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
  println!("{s}");
  Ok(())
}
