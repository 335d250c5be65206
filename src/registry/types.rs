//! Data structures for the species registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference metadata for one species.
///
/// Records are built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpeciesRecord {
    /// Lowercase canonical identifier (e.g., "red lionfish").
    pub key: String,
    /// Display name.
    pub common_name: String,
    /// Binomial name.
    pub scientific_name: String,
    /// Whether the species is invasive in the covered region.
    pub is_invasive: bool,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SpeciesRecord {
    /// Project the record onto the metadata attached to predictions.
    pub fn metadata(&self) -> SpeciesMetadata {
        SpeciesMetadata {
            common_name: self.common_name.clone(),
            scientific_name: self.scientific_name.clone(),
            is_invasive: self.is_invasive,
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        }
    }
}

/// Species metadata as reported alongside a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpeciesMetadata {
    /// Display name.
    pub common_name: String,
    /// Binomial name.
    pub scientific_name: String,
    /// Whether the species is invasive in the covered region.
    pub is_invasive: bool,
    /// Free-form notes; empty notes are omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// On-disk layout of a custom species table.
///
/// ```toml
/// [[species]]
/// key = "red lionfish"
/// common_name = "Red Lionfish"
/// scientific_name = "Pterois volitans"
/// is_invasive = true
///
/// [aliases]
/// lionfish = "red lionfish"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeciesTable {
    /// Species records.
    pub species: Vec<SpeciesRecord>,
    /// Alternate label to canonical key.
    pub aliases: BTreeMap<String, String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(notes: Option<&str>) -> SpeciesRecord {
        SpeciesRecord {
            key: "nurse shark".into(),
            common_name: "Nurse Shark".into(),
            scientific_name: "Ginglymostoma cirratum".into(),
            is_invasive: false,
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_metadata_drops_empty_notes() {
        assert_eq!(record(Some("")).metadata().notes, None);
        assert_eq!(record(Some("   ")).metadata().notes, None);
        assert_eq!(record(None).metadata().notes, None);
        assert_eq!(
            record(Some("Native reef species.")).metadata().notes,
            Some("Native reef species.".to_string())
        );
    }

    #[test]
    fn test_metadata_serializes_without_absent_notes() {
        let json = serde_json::to_value(record(None).metadata()).unwrap();
        assert_eq!(json["common_name"], "Nurse Shark");
        assert_eq!(json["is_invasive"], false);
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_deserialize_table_without_aliases() {
        let table: SpeciesTable = toml::from_str(
            r#"
[[species]]
key = "nurse shark"
common_name = "Nurse Shark"
scientific_name = "Ginglymostoma cirratum"
is_invasive = false
"#,
        )
        .unwrap();
        assert_eq!(table.species.len(), 1);
        assert!(table.aliases.is_empty());
        assert_eq!(table.species[0].notes, None);
    }
}
