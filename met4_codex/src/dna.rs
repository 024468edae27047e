// Style DNA: the quantitative fingerprint of a block of MET4 text.
//
// A `StyleDna` is a plain value produced fresh by every analysis call
// (`analyzer.rs`), averaged across documents by `aggregate.rs`, fed to the
// generator as its tuning knobs, and compared by `fidelity.rs`. The project
// profile is persisted as JSON between runs, so the serde shape here is the
// on-disk format: camelCase keys, glitch ratios nested under `glitchPatterns`.
//
// Ratios (`caps_lock_ratio`, `symbol_density`) live in [0, 1];
// `fragmentation_score` and `avg_sentence_length` are unbounded non-negative.
// Hand-edited profiles are accepted as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Casing and symbol ratios that define the "glitch" look of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlitchPatterns {
    /// Fraction of characters that are uppercase letters.
    pub caps_lock_ratio: f64,
    /// Fraction of characters that are neither alphanumeric nor whitespace.
    pub symbol_density: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDna {
    /// Uppercased entity handle (e.g. `@APOLO`) -> occurrence count.
    #[serde(default)]
    pub entity_registry: BTreeMap<String, u32>,
    /// Distinct lowercased words. Integral for a single analysis; a
    /// per-document mean once profiles are merged.
    pub vocabulary_size: f64,
    /// Mean word count per sentence.
    pub avg_sentence_length: f64,
    /// Symbols per word, times 100.
    pub fragmentation_score: f64,
    pub glitch_patterns: GlitchPatterns,
}

impl StyleDna {
    /// Parse a persisted profile.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize for persistence (pretty-printed, like the reports).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Copy of this profile with the two user-tunable glitch knobs replaced.
    ///
    /// `None` leaves a knob untouched. No re-analysis happens; the generator
    /// applies whatever values it is handed.
    pub fn with_overrides(&self, fragmentation: Option<f64>, caps_ratio: Option<f64>) -> Self {
        let mut dna = self.clone();
        if let Some(f) = fragmentation {
            dna.fragmentation_score = f;
        }
        if let Some(c) = caps_ratio {
            dna.glitch_patterns.caps_lock_ratio = c;
        }
        dna
    }

    /// Number of distinct entity handles seen.
    pub fn entity_count(&self) -> usize {
        self.entity_registry.len()
    }
}
