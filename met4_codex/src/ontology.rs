// Entity ontology and generator configuration.
//
// `CodexConfig` bundles the three static tables the synthetic generator
// reads:
// - `EntityOntology`: handle -> thematic category (e.g. `@DAFNE` -> arboreal),
//   plus per-category display metadata (label, color) for surrounding tools
// - `NameTable`: human-readable character name -> handle (`Apollo` -> `@APOLO`)
// - `FlavorTable`: category -> short flavor phrases for stochastic injection
//
// All three are loaded once from JSON via `CodexConfig::from_json()` and are
// read-only afterwards. `default_config()` embeds `data/codex_ontology.json`
// at compile time. Separate configs can coexist (one per corpus); nothing
// here is global.
//
// Ordering: ontology mappings and name pairs keep their JSON declaration
// order. The generator applies mappings in that order, and because each
// replacement sees the text left by the previous one, reordering the file
// can change output.
//
// Malformed-but-parseable data degrades at use time: an unknown category
// gets the default flavor list, a handle with no name entry resolves to
// itself minus the sigil.

use crate::analyzer::ENTITY_SIGIL;
use crate::error::CodexError;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Flavor list used when a category has no (or an empty) entry.
pub const DEFAULT_FLAVORS: &[&str] = &["metamorphosis"];

/// One handle -> category entry of the ontology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyMapping {
    pub handle: String,
    pub category: String,
}

/// Presentation metadata for a category. Not used by generation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Default)]
pub struct EntityOntology {
    mappings: Vec<OntologyMapping>,
    categories: BTreeMap<String, CategoryInfo>,
}

impl EntityOntology {
    /// Mappings in declaration order.
    pub fn mappings(&self) -> &[OntologyMapping] {
        &self.mappings
    }

    /// Category of `handle`, if it is mapped.
    pub fn category_of(&self, handle: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.handle == handle)
            .map(|m| m.category.as_str())
    }

    pub fn category_info(&self, category: &str) -> Option<&CategoryInfo> {
        self.categories.get(category)
    }

    pub fn categories(&self) -> &BTreeMap<String, CategoryInfo> {
        &self.categories
    }
}

/// Human name <-> handle lookup.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    /// (name, handle) pairs in declaration order.
    pairs: Vec<(String, String)>,
}

impl NameTable {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        NameTable { pairs }
    }

    /// Handle for a human name (exact match).
    pub fn handle_for(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h.as_str())
    }

    /// First declared human name for `handle`.
    pub fn name_for(&self, handle: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, h)| h == handle)
            .map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlavorTable {
    by_category: BTreeMap<String, Vec<String>>,
}

impl FlavorTable {
    pub fn new(by_category: BTreeMap<String, Vec<String>>) -> Self {
        FlavorTable { by_category }
    }

    /// Flavor phrases for `category`, or `DEFAULT_FLAVORS`.
    pub fn flavors_for(&self, category: &str) -> Vec<&str> {
        match self.by_category.get(category) {
            Some(list) if !list.is_empty() => list.iter().map(String::as_str).collect(),
            _ => DEFAULT_FLAVORS.to_vec(),
        }
    }
}

/// Everything the synthetic generator needs besides the DNA and the RNG.
#[derive(Debug, Clone, Default)]
pub struct CodexConfig {
    pub ontology: EntityOntology,
    pub names: NameTable,
    pub flavors: FlavorTable,
}

/// On-disk shape of the config file.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(deserialize_with = "ordered_pairs")]
    mappings: Vec<(String, String)>,
    #[serde(default)]
    categories: BTreeMap<String, CategoryInfo>,
    #[serde(default, deserialize_with = "ordered_pairs")]
    names: Vec<(String, String)>,
    #[serde(default)]
    flavors: BTreeMap<String, Vec<String>>,
}

impl CodexConfig {
    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, CodexError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        Ok(CodexConfig {
            ontology: EntityOntology {
                mappings: file
                    .mappings
                    .into_iter()
                    .map(|(handle, category)| OntologyMapping { handle, category })
                    .collect(),
                categories: file.categories,
            },
            names: NameTable::new(file.names),
            flavors: FlavorTable::new(file.flavors),
        })
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, CodexError> {
        let json = std::fs::read_to_string(path).map_err(|e| CodexError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Human-readable name for `handle`: the name table entry if present,
    /// otherwise the handle with its leading sigil removed.
    pub fn display_name<'a>(&'a self, handle: &'a str) -> &'a str {
        self.names
            .name_for(handle)
            .unwrap_or_else(|| handle.strip_prefix(ENTITY_SIGIL).unwrap_or(handle))
    }
}

/// Load the default config embedded at compile time.
///
/// Panics if the embedded JSON is malformed (caught by the tests below).
pub fn default_config() -> CodexConfig {
    let json = include_str!("../../data/codex_ontology.json");
    CodexConfig::from_json(json).expect("embedded codex_ontology.json is malformed")
}

/// Deserialize a JSON object of string values into (key, value) pairs,
/// keeping the object's declaration order.
fn ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of string values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((k, v)) = map.next_entry::<String, String>()? {
                pairs.push((k, v));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}
