use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context;
use clap::{ArgAction, ValueEnum};
use reqex::{
    Config, Extractor,
    domain::{Quoting, StripMode},
    storage::{self, Source},
};
use terminal::Colorize;
use tracing::instrument;

mod terminal;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The document to read requirements from
    input: PathBuf,

    /// The file to write the requirements table to (overwritten)
    output: PathBuf,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Normative keyword to match (repeatable; replaces the configured list)
    #[arg(short, long = "keyword", value_name = "WORD")]
    keywords: Vec<String>,

    /// How to read the input document (default: by file extension)
    #[arg(long, value_enum, default_value_t)]
    input_format: InputFormat,

    /// Output format (default: csv)
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// How clause markers are removed from their line
    #[arg(long, value_name = "MODE")]
    strip_mode: Option<StripMode>,

    /// Escape embedded quotes in CSV values
    #[arg(long)]
    escape: bool,

    /// Emit an open sub-clause when the next main clause starts
    #[arg(long)]
    flush_dangling: bool,
}

/// Supported input formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum InputFormat {
    #[default]
    Auto,
    Pdf,
    Text,
}

impl InputFormat {
    fn source(self, path: &Path) -> Source {
        match self {
            Self::Auto => Source::from_path(path),
            Self::Pdf => Source::Pdf,
            Self::Text => Source::Text,
        }
    }
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl Cli {
    pub fn run(self) -> ExitCode {
        Self::setup_logging(self.verbose);

        Self::report(self.extract())
    }

    /// Logs a failed run once and maps the outcome to the process exit code.
    fn report(result: anyhow::Result<()>) -> ExitCode {
        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{e:#}");
                ExitCode::FAILURE
            }
        }
    }

    #[instrument(skip(self), fields(input = %self.input.display(), output = %self.output.display()))]
    fn extract(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let extractor = Extractor::from_config(&config)?;

        let source = self.input_format.source(&self.input);
        let text = storage::load_text(&self.input, source)?;

        let extraction = extractor.extract(&text);
        if extraction.candidates == 0 {
            tracing::warn!("No numbered clauses found in {}", self.input.display());
        }

        let contents = match self.format {
            OutputFormat::Csv => {
                storage::encode_csv(&extraction.requirements, config.header(), config.quoting)
            }
            OutputFormat::Json => storage::encode_json(&extraction.requirements)
                .context("failed to encode requirements as JSON")?,
        };
        storage::write_output(&self.output, &contents)?;

        let summary = format!(
            "Requirements written to {} ({} of {} clauses)",
            self.output.display(),
            extraction.requirements.len(),
            extraction.candidates,
        );
        if extraction.requirements.is_empty() {
            println!("{}", summary.warning());
        } else {
            println!("{}", summary.success());
        }

        Ok(())
    }

    /// Loads the configuration file, if any, and applies command-line
    /// overrides.
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        if !self.keywords.is_empty() {
            config.set_keywords(self.keywords.clone())?;
        }
        if let Some(strip_mode) = self.strip_mode {
            config.strip_mode = strip_mode;
        }
        if self.escape {
            config.quoting = Quoting::Escaped;
        }
        if self.flush_dangling {
            config.flush_dangling_subclauses = true;
        }

        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}
