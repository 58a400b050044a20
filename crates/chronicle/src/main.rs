// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! chronicle: turn your git log into a story
//!
//! This binary reads the most recent commits of a repository, analyzes each
//! one with a hosted model (or the offline analyzer when no API key is set)
//! and prints the narrative on stdout.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use chronicle::config::Config;
use chronicle::generate;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr; stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: &Config) -> anyhow::Result<()> {
    config.validate()?;

    let provider = config.provider()?;
    info!(
        path = %config.path.display(),
        limit = config.limit,
        provider = provider.name(),
        "Generating chronicle"
    );
    debug!(
        format = ?config.format,
        color = ?config.color,
        stats = config.stats,
        concurrency = config.concurrency,
        "Run settings"
    );

    let results = generate(&config.generate_options(), provider).await?;
    let color = config.color.apply();
    let report = config.format.report(color).render(&results)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write report")?;

    Ok(())
}
