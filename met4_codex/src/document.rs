// Seed texts and synthetic document artifacts.
//
// A generation cycle picks one seed passage (a short source excerpt with
// provenance), runs it through the generator, and wraps the result in a
// markdown document whose header records where the text came from. The
// document is what `codex compare` later analyzes against the baseline,
// so the header lines are part of what gets measured.
//
// Corpus expansion works one level up: a manifest lists, per sikl (cycle),
// the Ovid book it draws on and that book's myths. Every myth summary
// becomes a seed, each is transformed independently, and the results form
// one expansion document per sikl.

use crate::dna::StyleDna;
use crate::error::CodexError;
use crate::generator::SyntheticGenerator;
use met4_prng::RandomSource;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A source passage used as generator input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub id: String,
    pub title: String,
    pub source: String,
    pub text: String,
}

/// Parse a JSON array of seeds.
pub fn seeds_from_json(json: &str) -> Result<Vec<Seed>, CodexError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_seeds(path: &Path) -> Result<Vec<Seed>, CodexError> {
    let json = std::fs::read_to_string(path).map_err(|e| CodexError::io(path, e))?;
    seeds_from_json(&json)
}

/// Pick one seed uniformly. `None` when there are no seeds.
pub fn pick_seed<'a, R: RandomSource>(seeds: &'a [Seed], rng: &mut R) -> Option<&'a Seed> {
    if seeds.is_empty() {
        return None;
    }
    Some(&seeds[rng.range_usize(0, seeds.len())])
}

/// Wrap generated text in the synthetic-cycle markdown layout.
pub fn render_synthetic_document(seed: &Seed, synthetic_text: &str) -> String {
    [
        format!("# Synthetic Cycle: @{}", seed.id.to_uppercase()),
        String::new(),
        "> Status: Algorithmic Extrapolation".to_string(),
        format!("> Source: {} ({})", seed.source, seed.title),
        String::new(),
        "## Full Text".to_string(),
        String::new(),
        synthetic_text.to_string(),
        String::new(),
    ]
    .join("\n")
}

/// One myth of a manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Myth {
    pub id: String,
    pub title: String,
    pub summary: String,
}

/// A sikl to synthesize from one book of the Metamorphoses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub sikl: u32,
    pub book: u32,
    pub myths: Vec<Myth>,
}

impl CorpusEntry {
    /// Stem for the entry's output file, e.g. `sikl-7`.
    pub fn slug(&self) -> String {
        format!("sikl-{}", self.sikl)
    }

    /// Generator input for `myth`.
    pub fn myth_seed(&self, myth: &Myth) -> String {
        format!("Ovid, Book {}: {}. {}", self.book, myth.title, myth.summary)
    }
}

/// Parse a JSON corpus manifest (an array of entries).
pub fn corpus_from_json(json: &str) -> Result<Vec<CorpusEntry>, CodexError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_corpus(path: &Path) -> Result<Vec<CorpusEntry>, CodexError> {
    let json = std::fs::read_to_string(path).map_err(|e| CodexError::io(path, e))?;
    corpus_from_json(&json)
}

/// Transform every myth of `entry` in order and render the sikl document.
///
/// Myths draw from `rng` one after another, so the whole manifest is
/// reproducible from a single seed.
pub fn expand_corpus_entry<R: RandomSource>(
    generator: &SyntheticGenerator,
    entry: &CorpusEntry,
    dna: &StyleDna,
    rng: &mut R,
) -> String {
    let content = entry
        .myths
        .iter()
        .map(|myth| generator.generate(&entry.myth_seed(myth), dna, rng))
        .collect::<Vec<_>>()
        .join("\n\n");
    render_expansion_document(entry, &content)
}

/// Wrap expanded text in the sikl markdown layout.
pub fn render_expansion_document(entry: &CorpusEntry, content: &str) -> String {
    [
        format!("# Sikl {}: Book {}", entry.sikl, entry.book),
        String::new(),
        "> Status: Algorithmic Expansion".to_string(),
        format!("> Source: Ovid, Metamorphoses Book {}", entry.book),
        String::new(),
        "## Full Text".to_string(),
        String::new(),
        content.to_string(),
        String::new(),
    ]
    .join("\n")
}
