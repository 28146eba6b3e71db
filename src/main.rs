// Copyright 2026 tgvmax-fetch Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tgvmax_fetch::browser::chromium::ChromiumLauncher;
use tgvmax_fetch::model::Query;
use tgvmax_fetch::orchestrator::Orchestrator;
use tgvmax_fetch::sources::maxjeune::MaxjeuneRetriever;
use tgvmax_fetch::sources::opendata::OpendataRetriever;

#[derive(Parser)]
#[command(
    name = "tgvmax-fetch",
    about = "Fetch TGV Max seat availability for one route and date",
    version
)]
struct Cli {
    /// Origin station code (e.g. "FRPAR")
    origin: String,

    /// Destination station code (e.g. "FRRST")
    destination: String,

    /// Travel date, YYYY-MM-DD
    #[arg(value_parser = parse_date)]
    date: String,
}

fn parse_date(s: &str) -> Result<String, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|_| s.to_string())
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = e.print();
                std::process::exit(0);
            }
            // Caller contract: any argument error is usage on stderr,
            // exit 1, nothing on stdout.
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Diagnostics go to stderr only; stdout is reserved for the result.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tgvmax_fetch=info".parse().unwrap()),
        )
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let query = Query {
        origin: cli.origin,
        destination: cli.destination,
        date: cli.date,
    };

    let primary = MaxjeuneRetriever::new(Box::new(ChromiumLauncher::new()));
    let fallback = OpendataRetriever::new();

    let result = Orchestrator::new(primary, fallback).run(&query).await?;

    // Exactly one JSON object on stdout, newline-terminated.
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
