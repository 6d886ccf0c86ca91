//! trade-ledger CLI
//!
//! Provides commands for:
//! - `run`: process every configured year range into the corpus artifact
//! - `parse`: parse a single trade paragraph
//! - `clauses`: show how a paragraph is split into clauses

mod cli;
mod logging;

use anyhow::{bail, Result};
use clap::Parser;
use cli::{Cli, Commands, ParseArgs, RunArgs};
use ledger_core::Config;
use ledger_extraction::{ExtractionService, OllamaClient, ReplayService, TransferExtractor};
use ledger_ingestion::preprocess_trade_text;
use ledger_pipeline::{parse_document, BatchOrchestrator, DocumentOutcome};
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    match &cli.command {
        Commands::Run(args) => run(&config, args).await,
        Commands::Parse(args) => parse(&config, args).await,
        Commands::Clauses(args) => {
            for clause in preprocess_trade_text(&args.text) {
                println!("{clause}");
            }
            Ok(())
        }
    }
}

fn make_service(config: &Config, replay: Option<&Path>) -> Result<Box<dyn ExtractionService>> {
    Ok(match replay {
        Some(path) => Box::new(ReplayService::from_file(path)?),
        None => Box::new(OllamaClient::new(&config.extraction)?),
    })
}

async fn run(config: &Config, args: &RunArgs) -> Result<()> {
    logging::init_logging(&config.logging, Some(config.logging.file.as_path()))?;

    let service = make_service(config, args.replay.as_deref())?;
    info!(
        service = service.name(),
        model = %config.extraction.model,
        ranges = ?config.corpus.year_ranges()?,
        "Starting run"
    );

    let mut orchestrator = BatchOrchestrator::new(config, service)?;
    let summary = orchestrator.run().await?;

    info!(
        total_trades = summary.total_trades,
        failed = summary.failed,
        rejected = summary.rejected,
        "Run complete"
    );
    println!("{summary}");
    Ok(())
}

async fn parse(config: &Config, args: &ParseArgs) -> Result<()> {
    logging::init_logging(&config.logging, None)?;

    let paragraph = args.paragraph()?;
    let mut extractor = TransferExtractor::new(make_service(config, args.replay.as_deref())?);

    match parse_document(&mut extractor, paragraph.trim()).await {
        DocumentOutcome::Parsed(trade) => {
            println!("{}", serde_json::to_string_pretty(&trade)?);
            Ok(())
        }
        DocumentOutcome::Rejected => bail!("no valid transfers found in paragraph"),
        DocumentOutcome::Failed(e) => Err(e.into()),
    }
}
