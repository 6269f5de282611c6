//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    catalog::CatalogCommands, completions::CompletionsArgs, eval::EvalArgs,
    hardware::HardwareCommands, price::PriceArgs, volume::VolumeArgs,
};

#[derive(Parser)]
#[command(name = "cabprice")]
#[command(author, version, about = "Cabinet pricing and physical-properties engine")]
#[command(long_about = "Price made-to-order cabinets and compute their freight volume and weight from a YAML catalog of cabinet recipes, materials and hardware.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog file or directory (default: config / CABPRICE_CATALOG)
    #[arg(long, short = 'c', global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate a dimension formula
    Eval(EvalArgs),

    /// Price a cabinet
    Price(PriceArgs),

    /// Freight volume and weight of a cabinet
    Volume(VolumeArgs),

    /// Hardware set resolution and pricing
    #[command(subcommand)]
    Hardware(HardwareCommands),

    /// Inspect the catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary or table, depending on the command
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}

/// Cabinet dimension overrides shared by pricing commands
#[derive(clap::Args, Clone, Copy, Debug, Default)]
pub struct DimensionArgs {
    /// Width in mm (default: cabinet default)
    #[arg(long, short = 'W')]
    pub width: Option<f64>,

    /// Height in mm (default: cabinet default)
    #[arg(long, short = 'H')]
    pub height: Option<f64>,

    /// Depth in mm (default: cabinet default)
    #[arg(long, short = 'D')]
    pub depth: Option<f64>,
}
