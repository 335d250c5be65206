//! Species table loading.

use super::lookup::{SpeciesRegistry, normalize_label};
use super::types::SpeciesTable;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Load a custom species table from a TOML file.
///
/// # Errors
/// - File cannot be read or parsed
/// - A record has an empty key, or two records share a key
/// - An alias points at a key that is not in the table
pub fn load_species_table(path: &Path) -> Result<SpeciesRegistry> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::SpeciesTableRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table: SpeciesTable = toml::from_str(&contents).map_err(|e| Error::SpeciesTableParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_table(&table).map_err(|message| Error::SpeciesTableInvalid {
        path: path.to_path_buf(),
        message,
    })?;

    let registry = SpeciesRegistry::from_table(table);
    debug!(
        "Loaded species table {}: {} species, {} aliases",
        path.display(),
        registry.len(),
        registry.alias_count()
    );
    Ok(registry)
}

/// Select the registry to classify against.
///
/// Uses the custom table when a path is given, the built-in table otherwise.
pub fn resolve_registry(table: Option<&Path>) -> Result<Arc<SpeciesRegistry>> {
    match table {
        Some(path) => {
            info!("Loading species table: {}", path.display());
            Ok(Arc::new(load_species_table(path)?))
        }
        None => Ok(SpeciesRegistry::builtin_shared()),
    }
}

fn validate_table(table: &SpeciesTable) -> std::result::Result<(), String> {
    let mut keys = HashSet::new();
    for record in &table.species {
        let key = normalize_label(&record.key);
        if key.is_empty() {
            return Err(format!(
                "species '{}' has an empty key",
                record.common_name
            ));
        }
        if !keys.insert(key.clone()) {
            return Err(format!("duplicate species key '{key}'"));
        }
    }

    for (alias, target) in &table.aliases {
        if normalize_label(alias).is_empty() {
            return Err(format!("alias for '{target}' is empty"));
        }
        if !keys.contains(&normalize_label(target)) {
            return Err(format!("alias '{alias}' points at unknown species '{target}'"));
        }
    }

    Ok(())
}
