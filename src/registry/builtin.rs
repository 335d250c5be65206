//! Built-in reference data for South Florida marine and coastal species.

use super::lookup::SpeciesRegistry;
use super::types::SpeciesRecord;
use std::sync::{Arc, LazyLock};

/// `(key, common name, scientific name, invasive, notes)`.
const SPECIES: &[(&str, &str, &str, bool, &str)] = &[
    // High-priority invasive species
    (
        "red lionfish",
        "Red Lionfish",
        "Pterois volitans",
        true,
        "Aggressive invasive predator known to disrupt reef ecosystems.",
    ),
    (
        "devil firefish",
        "Devil Firefish",
        "Pterois miles",
        true,
        "Close relative of red lionfish; both treated as invasive in South Florida.",
    ),
    (
        "green iguana",
        "Green Iguana",
        "Iguana iguana",
        true,
        "Terrestrial invasive reptile often spotted near coastal areas.",
    ),
    (
        "brown anole",
        "Brown Anole",
        "Anolis sagrei",
        true,
        "Competes with native lizards; included for completeness.",
    ),
    // Common native reference species
    (
        "queen angelfish",
        "Queen Angelfish",
        "Holacanthus ciliaris",
        false,
        "Native reef species.",
    ),
    (
        "spiny lobster",
        "Caribbean Spiny Lobster",
        "Panulirus argus",
        false,
        "",
    ),
    (
        "nurse shark",
        "Nurse Shark",
        "Ginglymostoma cirratum",
        false,
        "",
    ),
];

/// Alternate model labels mapped to canonical keys.
const ALIASES: &[(&str, &str)] = &[
    ("lionfish", "red lionfish"),
    ("pterois volitans", "red lionfish"),
    ("pterois miles", "devil firefish"),
    ("common lionfish", "red lionfish"),
    ("poison lionfish", "red lionfish"),
];

static BUILTIN: LazyLock<Arc<SpeciesRegistry>> = LazyLock::new(|| {
    let records = SPECIES
        .iter()
        .map(|&(key, common_name, scientific_name, is_invasive, notes)| SpeciesRecord {
            key: key.to_string(),
            common_name: common_name.to_string(),
            scientific_name: scientific_name.to_string(),
            is_invasive,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        });
    Arc::new(SpeciesRegistry::new(records, ALIASES.iter().copied()))
});

impl SpeciesRegistry {
    /// The built-in registry, constructed on first use.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Shared handle to the built-in registry.
    pub fn builtin_shared() -> Arc<Self> {
        Arc::clone(&*BUILTIN)
    }
}
