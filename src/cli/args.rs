//! CLI argument definitions.

use super::validators::{parse_confidence, parse_temperature, parse_top_k};
use crate::config::{OutputMode, ProviderKind, Ranking};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Invasive species classification for wildlife photos.
#[derive(Debug, Parser)]
#[command(name = "strikenet")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to classify.
    pub inputs: Vec<PathBuf>,

    /// Output and logging options.
    #[command(flatten)]
    pub output: OutputArgs,

    /// Options for classifying images.
    #[command(flatten)]
    pub classify: ClassifyArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect the species table.
    Species {
        /// Species action to perform.
        #[command(subcommand)]
        action: SpeciesAction,
    },
    /// Classify a saved upstream reply without calling the model.
    Normalize {
        /// File holding the reply body (JSON or model text).
        file: PathBuf,

        /// Classification options.
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Species subcommand actions.
#[derive(Debug, Clone, Subcommand)]
pub enum SpeciesAction {
    /// List known species and their aliases.
    List {
        /// Custom species table (TOML).
        #[arg(long, env = "STRIKENET_SPECIES_TABLE")]
        species_table: Option<PathBuf>,
    },
    /// Show how a label resolves.
    Lookup {
        /// Label as a model would report it (e.g., "Pterois volitans").
        label: String,

        /// Custom species table (TOML).
        #[arg(long, env = "STRIKENET_SPECIES_TABLE")]
        species_table: Option<PathBuf>,
    },
}

impl SpeciesAction {
    /// Species table override given on the command line.
    pub fn species_table(&self) -> Option<&PathBuf> {
        match self {
            Self::List { species_table } | Self::Lookup { species_table, .. } => {
                species_table.as_ref()
            }
        }
    }
}

/// Output options shared by every command.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Print one JSON envelope per result instead of a summary.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl OutputArgs {
    /// Selected output mode.
    pub fn mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

/// Arguments for classifying images.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Upstream provider options.
    #[command(flatten)]
    pub upstream: UpstreamArgs,

    /// Classification options.
    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,
}

/// Upstream provider overrides.
#[derive(Debug, Args)]
pub struct UpstreamArgs {
    /// Upstream provider protocol.
    #[arg(long, value_enum, env = "STRIKENET_PROVIDER")]
    pub provider: Option<ProviderKind>,

    /// Inference endpoint URL.
    #[arg(long, env = "STRIKENET_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token for the provider.
    #[arg(long, env = "STRIKENET_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Model identifier (openai provider).
    #[arg(long, env = "STRIKENET_MODEL")]
    pub model: Option<String>,

    /// Sampling temperature (openai provider, 0.0-2.0).
    #[arg(long, value_parser = parse_temperature, env = "STRIKENET_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Maximum output tokens (openai provider).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..), env = "STRIKENET_MAX_OUTPUT_TOKENS")]
    pub max_output_tokens: Option<u32>,

    /// Request timeout in seconds.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..), env = "STRIKENET_TIMEOUT")]
    pub timeout: Option<u64>,
}

/// Options shared by everything that turns predictions into a decision.
#[derive(Debug, Clone, Args)]
pub struct PipelineArgs {
    /// Number of ranked predictions to keep.
    #[arg(short = 'k', long, value_parser = parse_top_k, env = "STRIKENET_TOP_K")]
    pub top_k: Option<usize>,

    /// Confidence threshold for automatic identification (0.0-1.0).
    #[arg(short = 't', long, value_parser = parse_confidence, env = "STRIKENET_THRESHOLD")]
    pub threshold: Option<f32>,

    /// Prediction ordering before truncation.
    #[arg(long, value_enum, env = "STRIKENET_RANKING")]
    pub ranking: Option<Ranking>,

    /// Custom species table (TOML).
    #[arg(long, env = "STRIKENET_SPECIES_TABLE")]
    pub species_table: Option<PathBuf>,
}
