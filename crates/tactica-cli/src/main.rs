//! `tactica`: offline tooling for the puzzle curriculum.
//!
//! # Usage
//!
//! ```text
//! tactica classify --corpus puzzles.jsonl [--out classified.jsonl]
//! tactica generate --corpus puzzles.jsonl --curriculum curriculum.toml --out lessons.json
//! tactica validate --curriculum curriculum.toml
//! ```
//!
//! Logs go to stderr (`RUST_LOG` overrides the `info` default); reports go to
//! stdout.

mod commands;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Puzzle curriculum curation tools")]
struct Cli {
  /// Path to the TOML settings file.
  #[arg(
    short,
    long,
    global = true,
    env = "TACTICA_CONFIG",
    default_value = "tactica.toml"
  )]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Classify a corpus and print primary-theme statistics.
  Classify {
    /// Corpus as JSON Lines, one puzzle record per line.
    #[arg(long, value_name = "FILE")]
    corpus: PathBuf,

    /// Where to write classifications as JSON Lines.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
  },

  /// Select six puzzles for every lesson and write the manifest.
  Generate {
    #[arg(long, value_name = "FILE")]
    corpus: PathBuf,

    /// Curriculum tree as TOML.
    #[arg(long, value_name = "FILE")]
    curriculum: PathBuf,

    /// Where to write the lesson manifest.
    #[arg(long, value_name = "FILE")]
    out: PathBuf,
  },

  /// Check curriculum ordering rules.
  Validate {
    #[arg(long, value_name = "FILE")]
    curriculum: PathBuf,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let clean = match cli.command {
    Command::Classify { corpus, out } => {
      commands::classify(&settings, &corpus, out.as_deref())?
    }
    Command::Generate {
      corpus,
      curriculum,
      out,
    } => commands::generate(&settings, &corpus, &curriculum, &out)?,
    Command::Validate { curriculum, json } => {
      commands::validate(&settings, &curriculum, json)?
    }
  };

  Ok(if clean {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}
