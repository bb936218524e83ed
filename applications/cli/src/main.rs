//! Ripcheck - find potential ripping errors in WAVE files
use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use ripcheck_cli::{resolve_settings, run, Cli, ImageReporter, Source, TextReporter};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit code for usage and configuration errors
const USAGE_ERROR: u8 = 255;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USAGE_ERROR,
            };
            // nothing sensible to do if stderr is gone
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    match execute(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(USAGE_ERROR)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ripcheck=debug,ripcheck_cli=debug,ripcheck_core=debug"
    } else {
        "ripcheck=warn,ripcheck_cli=warn,ripcheck_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute(cli: &Cli) -> anyhow::Result<u8> {
    let settings = resolve_settings(cli).context("Invalid settings")?;
    tracing::debug!(?settings, "resolved settings");

    let sources = Source::from_args(&cli.files);
    let text = TextReporter::stdio();
    let (summary, write_error) = match cli.image_output() {
        Some((options, template)) => {
            let mut reporter = ImageReporter::new(text, options, template);
            let summary = run(&sources, &settings, &mut reporter);
            (summary, reporter.take_write_error())
        }
        None => {
            let mut reporter = text;
            let summary = run(&sources, &settings, &mut reporter);
            (summary, reporter.take_write_error())
        }
    };

    if let Some(err) = write_error {
        tracing::warn!(error = %err, "report output incomplete");
        return Ok(1);
    }
    Ok(summary.exit_code())
}
