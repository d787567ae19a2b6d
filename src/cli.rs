use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{DATA_DIR_ENV, DEFAULT_DATA_DIR};
use crate::split::Overflow;

#[derive(Parser, Debug)]
#[command(name = "tft-s16-tables")]
#[command(version, about = "Split, validate and load TFT Set 16 statistics tables")]
pub struct Cli {
    /// More log output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Policy for list values with more parts than target columns
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowArg {
    /// Keep the first N parts
    #[default]
    Truncate,
    /// Fail the run
    Reject,
}

impl From<OverflowArg> for Overflow {
    fn from(arg: OverflowArg) -> Self {
        match arg {
            OverflowArg::Truncate => Overflow::Truncate,
            OverflowArg::Reject => Overflow::Reject,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split one delimited column of a CSV file into fixed columns
    Split {
        /// Input CSV file
        input: PathBuf,

        /// Output CSV file
        output: PathBuf,

        /// Column holding the delimited list
        #[arg(short, long)]
        column: String,

        /// Prefix for the new columns (default: the column name)
        #[arg(short, long)]
        prefix: Option<String>,

        /// Number of columns to produce
        #[arg(short = 'n', long)]
        arity: usize,

        /// List delimiter
        #[arg(short, long, default_value = ";")]
        delimiter: String,

        /// What to do with values that have too many parts
        #[arg(long, value_enum, default_value_t = OverflowArg::Truncate)]
        overflow: OverflowArg,

        /// Overwrite the output if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Write the split items and traits tables from raw/ into processed/
    Process {
        /// Data directory containing raw/ and processed/
        #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Only include these datasets (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these datasets (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// What to do with values that have too many parts
        #[arg(long, value_enum, default_value_t = OverflowArg::Truncate)]
        overflow: OverflowArg,

        /// Overwrite existing processed files
        #[arg(short, long)]
        force: bool,
    },

    /// Rewrite a list column without doubled delimiters or whitespace
    Normalize {
        input: PathBuf,
        output: PathBuf,

        #[arg(short, long)]
        column: String,

        #[arg(short, long, default_value = ";")]
        delimiter: String,

        #[arg(short, long)]
        force: bool,
    },

    /// Write one row per element of a list column
    Explode {
        input: PathBuf,
        output: PathBuf,

        #[arg(short, long)]
        column: String,

        /// Rename the exploded column
        #[arg(long)]
        value_name: Option<String>,

        #[arg(short, long, default_value = ";")]
        delimiter: String,

        #[arg(short, long)]
        force: bool,
    },

    /// Build participant, unit and trait tables from the match files
    Canonical {
        /// Data directory containing raw/ and processed/
        #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Output subdirectory of processed/ (must not exist)
        #[arg(short, long, default_value = crate::canonical::DEFAULT_LABEL)]
        label: String,

        /// Highest placement that counts as a win
        #[arg(long, default_value_t = crate::canonical::DEFAULT_WIN_THRESHOLD)]
        win_threshold: u8,
    },

    /// Check every recognised file in raw/ and processed/
    Validate {
        /// Data directory containing raw/ and processed/
        #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Only include these datasets (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these datasets (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Players expected in every match
        #[arg(long, default_value_t = crate::validate::DEFAULT_EXPECTED_PARTICIPANTS)]
        expected_participants: usize,

        /// Treat participant count mismatches as errors
        #[arg(long)]
        strict: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import all recognised files into a SQLite database
    Load {
        /// Output SQLite database path
        output_db: PathBuf,

        /// Data directory containing raw/ and processed/
        #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Only include these datasets (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        include: Option<Vec<String>>,

        /// Exclude these datasets (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,
    },

    /// List all known datasets and their file names
    ListDatasets,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
