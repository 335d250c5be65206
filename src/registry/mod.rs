//! Species registry: reference metadata and label resolution.

#![allow(clippy::print_stdout)]

mod builtin;
pub mod loader;
mod lookup;
pub mod types;

pub use loader::{load_species_table, resolve_registry};
pub use lookup::{SpeciesRegistry, normalize_label};
pub use types::{SpeciesMetadata, SpeciesRecord, SpeciesTable};

/// Print every species in the registry.
pub fn list_species(registry: &SpeciesRegistry) {
    println!("Known species:");
    println!();

    for record in registry.list_all() {
        let status = if record.is_invasive {
            "INVASIVE"
        } else {
            "native"
        };
        println!("  {} [{status}]", record.key);
        println!("    {} ({})", record.common_name, record.scientific_name);

        let aliases = registry.aliases_of(&record.key);
        if !aliases.is_empty() {
            println!("    Aliases: {}", aliases.join(", "));
        }
        if let Some(notes) = record.notes.as_deref().filter(|n| !n.is_empty()) {
            println!("    Notes: {notes}");
        }
        println!();
    }

    println!(
        "{} species, {} aliases",
        registry.len(),
        registry.alias_count()
    );
}

/// Print how a label resolves against the registry.
pub fn show_lookup(registry: &SpeciesRegistry, label: &str) {
    match registry.lookup(label) {
        Some(record) => {
            let normalized = normalize_label(label);
            let via = if normalized == record.key {
                "canonical key".to_string()
            } else {
                format!("alias '{normalized}'")
            };
            println!("Label: {label}");
            println!("  Resolved via: {via}");
            println!("  Species: {} ({})", record.common_name, record.scientific_name);
            println!(
                "  Invasive: {}",
                if record.is_invasive { "Yes" } else { "No" }
            );
            if let Some(notes) = record.notes.as_deref() {
                println!("  Notes: {notes}");
            }
        }
        None => {
            println!("Label: {label}");
            println!("  No matching species in registry.");
        }
    }
}
