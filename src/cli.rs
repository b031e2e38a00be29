use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::source::Provider;

#[derive(Parser, Debug)]
#[command(name = "usage-to-sqlite")]
#[command(version, about = "Import competitive usage statistics into a SQLite catalog")]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the import commands
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// SQLite database holding the catalog
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Directory containing downloaded usage documents
    #[arg(short, long)]
    pub usage_dir: Option<PathBuf>,

    /// Only include these tiers, by usage name (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub include: Option<Vec<String>>,

    /// Exclude these tiers, by usage name (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Stop a generation at the first failed tier
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create catalog and usage tables if they do not exist
    Init {
        /// SQLite database path
        db: Option<PathBuf>,
    },

    /// Import self-reported ladder usage statistics
    Ladder {
        #[command(flatten)]
        args: ImportArgs,

        /// Generations to import (repeatable, default: all)
        #[arg(short, long = "gen")]
        gens: Vec<u8>,

        /// Rating bracket for tiers that do not set their own
        #[arg(long)]
        ladder_ref: Option<String>,

        /// Highest generation when none is given
        #[arg(long)]
        last_gen: Option<u8>,
    },

    /// Import official tournament standings for the latest generation
    Official {
        #[command(flatten)]
        args: ImportArgs,

        /// Generation holding the official tiers
        #[arg(short, long = "gen")]
        gen: Option<u8>,
    },

    /// Delete the usage rows of one (generation, tier, provider) batch
    Clear {
        /// SQLite database path
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Generation of the tier
        #[arg(short, long = "gen")]
        gen: u8,

        /// Tier usage name
        #[arg(short, long)]
        tier: String,

        /// showdown or home
        #[arg(short, long)]
        provider: Provider,
    },

    /// List all table names in creation order
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
