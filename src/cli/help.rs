//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::{Config, ProviderKind};

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if needs_setup(config) {
        print_first_time_help();
    } else {
        print_configured_help();
    }
}

/// Whether the upstream still runs on bare defaults without credentials.
fn needs_setup(config: &Config) -> bool {
    config.upstream.api_token.is_none() && config.upstream.endpoint.is_none()
}

/// Print detailed setup guide for first-time users.
pub fn print_first_time_help() {
    println!("No upstream configured yet. Get started with StrikeNet:");
    println!();
    println!("1. Initialize configuration:");
    println!("   strikenet config init");
    println!();
    println!("2. Point it at an image classification model, either");
    println!(
        "   a Hugging Face endpoint (provider = \"{}\", default {})",
        ProviderKind::HuggingFace,
        ProviderKind::HuggingFace.default_endpoint()
    );
    println!(
        "   or an OpenAI compatible chat endpoint (provider = \"{}\")",
        ProviderKind::OpenAi
    );
    println!("   and set api_token, or export STRIKENET_API_TOKEN.");
    println!();
    println!("3. Classify photos:");
    println!("   strikenet reef.jpg dive_photos/");
    println!();
    println!("Saved model replies can be checked offline with 'strikenet normalize reply.json'.");
    println!("Run 'strikenet -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help() {
    println!("Usage: strikenet [IMAGES]... [OPTIONS]");
    println!();
    println!("Example: strikenet reef.jpg --threshold 0.7 --json");
    println!();
    println!("Run 'strikenet -h' for all options or 'strikenet species list' to see known species.");
}
