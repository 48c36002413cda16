//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// amrscope: MDR classification and carbapenem association analysis
#[derive(Parser)]
#[command(name = "amrscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by the commands that read an isolate table.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Path to the isolate table (CSV/TSV)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Category configuration JSON (default: standard panel)
    #[arg(long, value_name = "JSON")]
    pub categories: Option<PathBuf>,

    /// Column holding the isolate identifier
    #[arg(long)]
    pub id_column: Option<String>,

    /// Treat unrecognized interpretation codes as missing instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Field delimiter (default: auto-detect)
    #[arg(short, long)]
    pub delimiter: Option<char>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify isolates and test the MDR / carbapenem association
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Directory for exported tables (default: alongside the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Confidence level of the odds-ratio interval
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Classify isolates without the association analysis
    Classify {
        #[command(flatten)]
        input: InputArgs,

        /// Output path for the augmented table (default: <file>_classified.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the exact test on raw 2x2 counts
    Fisher {
        /// MDR and carbapenem-resistant
        a: usize,
        /// MDR and carbapenem-susceptible
        b: usize,
        /// Non-MDR and carbapenem-resistant
        c: usize,
        /// Non-MDR and carbapenem-susceptible
        d: usize,

        /// Confidence level of the odds-ratio interval
        #[arg(long, default_value = "0.95")]
        confidence: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the antimicrobial category panel
    Categories {
        /// Category configuration JSON to show instead of the standard panel
        #[arg(long, value_name = "JSON")]
        file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
