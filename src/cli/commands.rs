use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "estatemind",
    about = "AI gateway for real-estate SQL analysis and grounded property search",
    version,
    author
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Load settings from this env file instead of ./.env
    #[arg(long, global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a question about the CRM data into SQL
    Ask {
        /// Natural language question
        #[arg(value_name = "QUESTION", required_unless_present = "template")]
        question: Option<String>,

        /// Run a quick analysis template instead (see `templates`)
        #[arg(short, long, conflicts_with = "question")]
        template: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Interactive SQL analyst chat
    Chat,

    /// Web-grounded market search
    Search {
        /// What to search for
        #[arg(value_name = "TOPIC")]
        topic: String,

        /// Portal category: residential, commercial, plots, rental, luxury
        #[arg(short, long, default_value = "residential")]
        category: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Map-grounded search around a coordinate
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// What to look for
        #[arg(short, long, value_enum, default_value = "listings")]
        kind: KindArg,

        /// Print the model answer as-is instead of a parsed table
        #[arg(long)]
        raw: bool,
    },

    /// List the quick analysis templates
    Templates,

    /// Print the database schema given to the analyst model
    Schema,

    /// Show information about EstateMind
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Listings,
    Plots,
    Villas,
    Agencies,
}

impl From<KindArg> for crate::gateway::NearbyKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Listings => Self::Listings,
            KindArg::Plots => Self::Plots,
            KindArg::Villas => Self::Villas,
            KindArg::Agencies => Self::Agencies,
        }
    }
}
