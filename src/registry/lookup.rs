//! Label to species resolution.

use super::types::{SpeciesRecord, SpeciesTable};
use std::collections::{BTreeMap, HashMap};

/// Immutable species lookup table with alias resolution.
///
/// Safe to share between any number of concurrent readers.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    species: BTreeMap<String, SpeciesRecord>,
    aliases: HashMap<String, String>,
}

/// Normalize a label or key for comparison.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

impl SpeciesRegistry {
    /// Build a registry from species records and `(alias, key)` pairs.
    ///
    /// Keys and aliases are normalized. A later record with the same key
    /// replaces an earlier one.
    pub fn new<R, A, S>(records: R, aliases: A) -> Self
    where
        R: IntoIterator<Item = SpeciesRecord>,
        A: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let species = records
            .into_iter()
            .map(|mut record| {
                record.key = normalize_label(&record.key);
                (record.key.clone(), record)
            })
            .collect();

        let aliases = aliases
            .into_iter()
            .map(|(alias, key)| (normalize_label(alias.as_ref()), normalize_label(key.as_ref())))
            .collect();

        Self { species, aliases }
    }

    /// Build a registry from a parsed species table.
    pub fn from_table(table: SpeciesTable) -> Self {
        Self::new(table.species, table.aliases)
    }

    /// Resolve a model label to a species record.
    ///
    /// Canonical keys win over aliases. Never fails; unknown labels and
    /// aliases pointing at a missing key both yield `None`.
    pub fn lookup(&self, label: &str) -> Option<&SpeciesRecord> {
        let key = normalize_label(label);
        if let Some(record) = self.species.get(&key) {
            return Some(record);
        }
        self.aliases
            .get(&key)
            .and_then(|canonical| self.species.get(canonical))
    }

    /// All records, ordered by key.
    pub fn list_all(&self) -> Vec<&SpeciesRecord> {
        self.species.values().collect()
    }

    /// Aliases of the given canonical key, sorted.
    pub fn aliases_of(&self, key: &str) -> Vec<&str> {
        let key = normalize_label(key);
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| **target == key)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Aliases whose target key is not in the table, as `(alias, key)`.
    pub fn dangling_aliases(&self) -> Vec<(&str, &str)> {
        let mut dangling: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .filter(|(_, key)| !self.species.contains_key(*key))
            .map(|(alias, key)| (alias.as_str(), key.as_str()))
            .collect();
        dangling.sort_unstable();
        dangling
    }

    /// Number of species records.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the registry holds no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Number of aliases.
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(key: &str, is_invasive: bool) -> SpeciesRecord {
        SpeciesRecord {
            key: key.to_string(),
            common_name: key.to_string(),
            scientific_name: format!("{key} sp."),
            is_invasive,
            notes: None,
        }
    }

    fn test_registry() -> SpeciesRegistry {
        SpeciesRegistry::new(
            [record("Cane Toad", true), record("gopher tortoise", false)],
            [("bufo", "cane toad"), ("ghost", "missing key")],
        )
    }

    #[test]
    fn test_lookup_exact_key_is_case_and_space_insensitive() {
        let registry = test_registry();
        let record = registry.lookup("  CANE toad ").unwrap();
        assert_eq!(record.key, "cane toad");
        assert!(record.is_invasive);
    }

    #[test]
    fn test_lookup_alias_redirects_to_canonical() {
        let registry = test_registry();
        assert_eq!(registry.lookup("Bufo"), registry.lookup("cane toad"));
    }

    #[test]
    fn test_lookup_unknown_label_is_none() {
        let registry = test_registry();
        assert!(registry.lookup("manatee").is_none());
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("   ").is_none());
    }

    #[test]
    fn test_lookup_dangling_alias_is_none() {
        let registry = test_registry();
        assert!(registry.lookup("ghost").is_none());
        assert_eq!(registry.dangling_aliases(), vec![("ghost", "missing key")]);
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let registry = SpeciesRegistry::new(
            [record("anole", false), record("brown anole", true)],
            [("anole", "brown anole")],
        );
        assert_eq!(registry.lookup("anole").unwrap().key, "anole");
    }

    #[test]
    fn test_list_all_is_sorted_and_stable() {
        let registry = test_registry();
        let keys: Vec<&str> = registry.list_all().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["cane toad", "gopher tortoise"]);
        let again: Vec<&str> = registry.list_all().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn test_aliases_of() {
        let registry = test_registry();
        assert_eq!(registry.aliases_of("Cane Toad"), vec!["bufo"]);
        assert!(registry.aliases_of("gopher tortoise").is_empty());
    }

    #[test]
    fn test_empty_registry() {
        let registry = SpeciesRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.lookup("lionfish").is_none());
    }
}
