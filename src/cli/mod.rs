//! CLI argument parsing and command handling.

mod args;
pub mod help;
mod validators;

pub use args::{
    ClassifyArgs, Cli, Command, ConfigAction, OutputArgs, PipelineArgs, SpeciesAction,
    UpstreamArgs,
};
pub use validators::{parse_bounded_float, parse_confidence, parse_temperature, parse_top_k};
