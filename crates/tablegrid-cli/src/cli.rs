use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tablegrid::{DetectionSettings, Strategy};

/// Detect tables in rendered PDF page dumps.
#[derive(Debug, Parser)]
#[command(name = "tablegrid", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect and extract tables from page dumps
    Tables {
        /// Path to a JSON page dump (one page object or an array of pages)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Strategies to try, in order (comma-separated)
        #[arg(long, value_enum, value_delimiter = ',', default_values_t = default_strategies())]
        strategies: Vec<StrategyArg>,

        #[command(flatten)]
        tolerances: ToleranceArgs,

        /// Keep columns and tables that contain no text
        #[arg(long)]
        keep_empty: bool,
    },

    /// Show the edges captured from each page before and after merging
    Edges {
        /// Path to a JSON page dump (one page object or an array of pages)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = EdgesFormat::Text)]
        format: EdgesFormat,

        #[command(flatten)]
        tolerances: ToleranceArgs,
    },
}

/// Page-relative tolerances shared by the subcommands.
#[derive(Debug, Clone, clap::Args)]
pub struct ToleranceArgs {
    /// Snap tolerance as a fraction of page width (default: 0.005)
    #[arg(long, default_value_t = 0.005)]
    pub snap_ratio: f64,

    /// Join tolerance as a fraction of page width (default: 0.005)
    #[arg(long, default_value_t = 0.005)]
    pub join_ratio: f64,

    /// Intersection tolerance as a fraction of page diagonal (default: 0.0015)
    #[arg(long, default_value_t = 0.0015)]
    pub intersection_ratio: f64,
}

/// Output format for table results.
#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned plain-text grid
    Text,
    /// JSON array of tables
    Json,
    /// CSV, tables separated by a blank line
    Csv,
    /// GitHub Flavored Markdown tables
    Markdown,
}

/// Output format for the edges subcommand.
#[derive(Debug, Clone, ValueEnum, PartialEq, Eq)]
pub enum EdgesFormat {
    Text,
    Json,
}

/// Detection strategy names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StrategyArg {
    /// Ruled grid of horizontal and vertical lines
    Grid,
    /// Horizontal rules with text-aligned columns
    HorizontalDividers,
    /// Key/value text layout without rulings
    TwoColumn,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Grid => Strategy::Grid,
            StrategyArg::HorizontalDividers => Strategy::HorizontalDividers,
            StrategyArg::TwoColumn => Strategy::TwoColumn,
        }
    }
}

fn default_strategies() -> Vec<StrategyArg> {
    vec![
        StrategyArg::Grid,
        StrategyArg::HorizontalDividers,
        StrategyArg::TwoColumn,
    ]
}

impl ToleranceArgs {
    /// Apply the tolerances on top of `settings`.
    pub fn apply(&self, settings: DetectionSettings) -> DetectionSettings {
        DetectionSettings {
            snap_tolerance_ratio: self.snap_ratio,
            join_tolerance_ratio: self.join_ratio,
            intersection_tolerance_ratio: self.intersection_ratio,
            ..settings
        }
    }
}

/// Build detection settings from `tables` arguments.
pub fn build_settings(
    strategies: &[StrategyArg],
    tolerances: &ToleranceArgs,
    keep_empty: bool,
) -> DetectionSettings {
    let settings = DetectionSettings {
        strategies: strategies.iter().map(|&s| s.into()).collect(),
        drop_textless_columns: !keep_empty,
        drop_textless_tables: !keep_empty,
        ..DetectionSettings::default()
    };
    tolerances.apply(settings)
}
