//! Command-line definitions.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ledger_core::Config;
use std::path::PathBuf;

/// Build a structured trade ledger from transaction archives
#[derive(Parser, Debug)]
#[command(name = "trade-ledger")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Extraction service endpoint
    #[arg(long, env = "OLLAMA_HOST", global = true)]
    pub endpoint: Option<String>,

    /// Extraction model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every configured year range
    Run(RunArgs),
    /// Parse one trade paragraph and print the trade as JSON
    Parse(ParseArgs),
    /// Print the cleaned clauses of a paragraph
    Clauses(ClausesArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Answer from recorded responses instead of calling the service
    #[arg(long)]
    pub replay: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Paragraph text
    #[arg(required_unless_present = "file")]
    pub text: Option<String>,

    /// Read the paragraph from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Answer from recorded responses instead of calling the service
    #[arg(long)]
    pub replay: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClausesArgs {
    /// Paragraph text
    pub text: String,
}

impl Cli {
    /// Load the configuration and apply command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path).with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.extraction.endpoint = endpoint_url(endpoint);
        }
        if let Some(model) = &self.model {
            config.extraction.model = model.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

impl ParseArgs {
    /// The paragraph, from the argument or the file.
    pub fn paragraph(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => {
                std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
            }
            (None, None) => anyhow::bail!("no paragraph given"),
        }
    }
}

/// `OLLAMA_HOST` is often a bare `host:port`.
pub fn endpoint_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}
