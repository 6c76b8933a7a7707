//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Tally - Extract financial data from documents and analyze it
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Financial document extraction and tax analysis", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract and normalize financial fields from a document
    Extract {
        /// Document to process
        #[arg(short, long)]
        file: PathBuf,

        /// MIME type (inferred from the file extension if not given)
        #[arg(short, long)]
        mime: Option<String>,

        /// Print the raw field map instead of the normalized records
        #[arg(long)]
        raw: bool,
    },

    /// Quick flat-rate tax estimate from a document
    Estimate {
        /// Document to process
        #[arg(short, long)]
        file: PathBuf,

        /// MIME type (inferred from the file extension if not given)
        #[arg(short, long)]
        mime: Option<String>,

        /// Which records to estimate over
        #[arg(short, long, value_enum, default_value = "combined")]
        scope: EstimateScope,

        /// Tax credits to apply
        #[arg(short, long, default_value_t = 0.0)]
        credits: f64,
    },

    /// Full bracket-based tax optimization
    Optimize {
        /// Document to process
        #[arg(short, long)]
        file: PathBuf,

        /// MIME type (inferred from the file extension if not given)
        #[arg(short, long)]
        mime: Option<String>,

        /// JSON file with budget transactions and investment positions
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Generate insights from budget and investment data
    Insights {
        /// JSON file with budget transactions and investment positions
        #[arg(long)]
        snapshot: PathBuf,

        /// Insight categories: budget, investment, general, all
        #[arg(short, long, default_value = "all")]
        kind: String,
    },

    /// Test the configured text-generation backend
    Backend,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EstimateScope {
    Personal,
    Business,
    Combined,
}
