//! StrikeNet - invasive species classification CLI tool.
//!
//! This crate sends wildlife photos to an image classification model, folds
//! the model's reply into a ranked prediction list, resolves each label
//! against a species table and decides whether the photo shows an invasive
//! species.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod registry;

use clap::Parser;
use cli::{ClassifyArgs, Cli, Command, ConfigAction, PipelineArgs, SpeciesAction, UpstreamArgs};
use config::{
    Config, OutputMode, UpstreamConfig, config_file_path, load_default_config,
    save_default_config, validate_config,
};
use inference::{ClassifierOptions, HttpGateway, RawPayload, SpeciesClassifier};
use output::{
    ClassificationPayload, ConfigPayload, ErrorSeverity, JsonReporter, ResultType, SpeciesEntry,
    SpeciesListPayload, SpeciesLookupPayload, emit_json_result,
};
use pipeline::{ImageUpload, collect_input_images};
use registry::{SpeciesRegistry, normalize_label, resolve_registry};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for strikenet CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.output.verbose, cli.output.quiet);

    let mode = cli.output.mode();
    let result = dispatch(cli, mode);

    if mode == OutputMode::Json
        && let Err(e) = &result
    {
        output::emit_json_error(e);
    }

    result
}

fn dispatch(cli: Cli, mode: OutputMode) -> Result<()> {
    // Load configuration
    let config = load_default_config()?;

    // Handle subcommands
    if let Some(command) = cli.command {
        return handle_command(command, mode, config);
    }

    // Show help if no inputs provided
    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        return Ok(());
    }

    classify_images(&cli.inputs, &cli.classify, mode, config)
}

/// Classify input images with the given options.
fn classify_images(
    inputs: &[PathBuf],
    args: &ClassifyArgs,
    mode: OutputMode,
    mut config: Config,
) -> Result<()> {
    let total_start = Instant::now();

    // Collect all input files
    let files = collect_input_images(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImages);
    }

    info!("Found {} image(s) to classify", files.len());

    apply_upstream_overrides(&mut config.upstream, &args.upstream);
    apply_pipeline_overrides(&mut config, &args.pipeline);
    validate_config(&config)?;

    let classifier = build_classifier(&config)?;
    let gateway = HttpGateway::from_config(&config.upstream, config.classification.top_k)?;
    let reporter = (mode == OutputMode::Json).then(JsonReporter::new);
    let runtime = tokio::runtime::Runtime::new()?;

    let fail_fast = args.fail_fast;
    let mut classified = 0;
    let mut flagged = 0;
    let mut errors = 0;
    let mut last_error = None;

    for file in &files {
        let outcome = ImageUpload::from_path(file).and_then(|upload| {
            let result = runtime.block_on(classifier.classify_image(&gateway, &upload))?;
            Ok((upload.mime_type, result))
        });

        match outcome {
            Ok((mime_type, result)) => {
                classified += 1;
                if result.invasive == Some(true) {
                    flagged += 1;
                }
                info!("{}: {}", file.display(), result.decision);

                if let Some(reporter) = &reporter {
                    reporter.result(&ClassificationPayload {
                        result_type: ResultType::Classification,
                        file: file.clone(),
                        mime_type: Some(mime_type),
                        result,
                    });
                } else {
                    output::print_summary(file, &result)?;
                }
            }
            Err(e) => {
                error!("Failed to classify {}: {}", file.display(), e);
                errors += 1;
                if fail_fast {
                    return Err(e);
                }
                if let Some(reporter) = &reporter {
                    reporter.error(&e, ErrorSeverity::Warning, Some(file));
                }
                last_error = Some(e);
            }
        }
    }

    // Summary
    info!(
        "Complete: {} classified, {} invasive signal(s), {} errors in {:.2}s",
        classified,
        flagged,
        errors,
        total_start.elapsed().as_secs_f64()
    );

    if errors > 0 {
        warn!("{} image(s) had errors", errors);
    }

    match last_error {
        Some(e) if classified == 0 => Err(e),
        _ => Ok(()),
    }
}

/// Run the decision pipeline on a saved upstream reply.
fn normalize_file(file: &Path, args: &PipelineArgs, mode: OutputMode, mut config: Config) -> Result<()> {
    apply_pipeline_overrides(&mut config, args);
    validate_config(&config)?;

    let body = std::fs::read_to_string(file).map_err(|e| Error::ResponseRead {
        path: file.to_path_buf(),
        source: e,
    })?;
    let payload = serde_json::from_str(&body).map_or(RawPayload::Text(body), RawPayload::Json);

    let classifier = build_classifier(&config)?;
    let result = classifier.classify_payload(&payload)?;

    match mode {
        OutputMode::Json => emit_json_result(&ClassificationPayload {
            result_type: ResultType::Classification,
            file: file.to_path_buf(),
            mime_type: None,
            result,
        }),
        OutputMode::Human => output::print_summary(file, &result)?,
    }

    Ok(())
}

fn build_classifier(config: &Config) -> Result<SpeciesClassifier> {
    let registry = resolve_registry(config.species.table.as_deref())?;
    let options = ClassifierOptions::from(&config.classification);
    info!(
        "Classifying with top_k={}, threshold={}, ranking={} ({} species)",
        options.top_k,
        options.threshold,
        options.ranking,
        registry.len()
    );
    Ok(SpeciesClassifier::new(registry, options))
}

/// Apply command-line and environment overrides to upstream settings.
fn apply_upstream_overrides(upstream: &mut UpstreamConfig, args: &UpstreamArgs) {
    if let Some(provider) = args.provider {
        // Provider switch without an explicit endpoint falls back to the new default
        if upstream.provider != provider && args.endpoint.is_none() {
            upstream.endpoint = None;
        }
        upstream.provider = provider;
    }
    if let Some(endpoint) = &args.endpoint {
        upstream.endpoint = Some(endpoint.clone());
    }
    if let Some(token) = &args.api_token {
        upstream.api_token = Some(token.clone());
    }
    if let Some(model) = &args.model {
        upstream.model.clone_from(model);
    }
    if let Some(temperature) = args.temperature {
        upstream.temperature = temperature;
    }
    if let Some(max_output_tokens) = args.max_output_tokens {
        upstream.max_output_tokens = max_output_tokens;
    }
    if let Some(timeout) = args.timeout {
        upstream.timeout_secs = timeout;
    }
}

/// Apply command-line and environment overrides to classification settings.
fn apply_pipeline_overrides(config: &mut Config, args: &PipelineArgs) {
    if let Some(top_k) = args.top_k {
        config.classification.top_k = top_k;
    }
    if let Some(threshold) = args.threshold {
        config.classification.threshold = threshold;
    }
    if let Some(ranking) = args.ranking {
        config.classification.ranking = ranking;
    }
    if let Some(table) = &args.species_table {
        config.species.table = Some(table.clone());
    }
}

/// Initialize logging to stderr.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, mode: OutputMode, config: Config) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action, mode, &config),
        Command::Species { action } => handle_species_command(&action, mode, &config),
        Command::Normalize { file, pipeline } => normalize_file(&file, &pipeline, mode, config),
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction, mode: OutputMode, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
                println!("Edit it directly or run 'strikenet config show'.");
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  set [upstream] endpoint and api_token, then run 'strikenet <IMAGE>'");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let redacted = config.redacted();
            match mode {
                OutputMode::Json => emit_json_result(&ConfigPayload {
                    result_type: ResultType::Config,
                    config_path: config_file_path()?,
                    config: redacted,
                }),
                OutputMode::Human => {
                    let text = toml::to_string_pretty(&redacted)
                        .map_err(|e| Error::ConfigSerialize { source: e })?;
                    println!("{text}");
                }
            }
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn handle_species_command(action: &SpeciesAction, mode: OutputMode, config: &Config) -> Result<()> {
    let table = action
        .species_table()
        .map(PathBuf::as_path)
        .or(config.species.table.as_deref());
    let registry = resolve_registry(table)?;

    match (action, mode) {
        (SpeciesAction::List { .. }, OutputMode::Json) => {
            emit_json_result(&species_list_payload(&registry));
        }
        (SpeciesAction::List { .. }, OutputMode::Human) => registry::list_species(&registry),
        (SpeciesAction::Lookup { label, .. }, OutputMode::Json) => {
            emit_json_result(&SpeciesLookupPayload {
                result_type: ResultType::SpeciesLookup,
                label: label.clone(),
                normalized_label: normalize_label(label),
                species: registry.lookup(label).map(registry::SpeciesRecord::metadata),
            });
        }
        (SpeciesAction::Lookup { label, .. }, OutputMode::Human) => {
            registry::show_lookup(&registry, label);
        }
    }

    Ok(())
}

fn species_list_payload(registry: &SpeciesRegistry) -> SpeciesListPayload {
    let species = registry
        .list_all()
        .into_iter()
        .map(|record| SpeciesEntry {
            key: record.key.clone(),
            metadata: record.metadata(),
            aliases: registry
                .aliases_of(&record.key)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    SpeciesListPayload {
        result_type: ResultType::SpeciesList,
        species_count: registry.len(),
        alias_count: registry.alias_count(),
        species,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::{ProviderKind, Ranking};

    fn upstream_args() -> UpstreamArgs {
        UpstreamArgs {
            provider: None,
            endpoint: None,
            api_token: None,
            model: None,
            temperature: None,
            max_output_tokens: None,
            timeout: None,
        }
    }

    #[test]
    fn test_pipeline_overrides_replace_file_values() {
        let mut config = Config::default();
        let args = PipelineArgs {
            top_k: Some(2),
            threshold: Some(0.8),
            ranking: Some(Ranking::Score),
            species_table: Some(PathBuf::from("species.toml")),
        };
        apply_pipeline_overrides(&mut config, &args);
        assert_eq!(config.classification.top_k, 2);
        assert_eq!(config.classification.threshold, 0.8);
        assert_eq!(config.classification.ranking, Ranking::Score);
        assert_eq!(config.species.table, Some(PathBuf::from("species.toml")));
    }

    #[test]
    fn test_absent_overrides_keep_file_values() {
        let mut config = Config::default();
        config.classification.top_k = 7;
        config.upstream.timeout_secs = 90;
        apply_pipeline_overrides(
            &mut config,
            &PipelineArgs {
                top_k: None,
                threshold: None,
                ranking: None,
                species_table: None,
            },
        );
        apply_upstream_overrides(&mut config.upstream, &upstream_args());
        assert_eq!(config.classification.top_k, 7);
        assert_eq!(config.upstream.timeout_secs, 90);
    }

    #[test]
    fn test_provider_switch_resets_configured_endpoint() {
        let mut upstream = UpstreamConfig {
            endpoint: Some("https://example.org/models/reef".into()),
            ..UpstreamConfig::default()
        };
        let args = UpstreamArgs {
            provider: Some(ProviderKind::OpenAi),
            api_token: Some("sk-test".into()),
            ..upstream_args()
        };
        apply_upstream_overrides(&mut upstream, &args);
        assert_eq!(upstream.provider, ProviderKind::OpenAi);
        assert_eq!(
            upstream.resolved_endpoint(),
            ProviderKind::OpenAi.default_endpoint()
        );
        assert_eq!(upstream.api_token.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_explicit_endpoint_wins_over_provider_default() {
        let mut upstream = UpstreamConfig::default();
        let args = UpstreamArgs {
            provider: Some(ProviderKind::OpenAi),
            endpoint: Some("http://localhost:8080/v1/chat/completions".into()),
            timeout: Some(5),
            ..upstream_args()
        };
        apply_upstream_overrides(&mut upstream, &args);
        assert_eq!(
            upstream.resolved_endpoint(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(upstream.timeout_secs, 5);
    }

    #[test]
    fn test_species_list_payload_counts() {
        let payload = species_list_payload(SpeciesRegistry::builtin());
        assert_eq!(payload.species_count, payload.species.len());
        let red = payload
            .species
            .iter()
            .find(|s| s.key == "red lionfish")
            .unwrap();
        assert!(red.metadata.is_invasive);
        assert!(red.aliases.contains(&"lionfish".to_string()));
    }
}
