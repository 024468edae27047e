// Style analyzer: extracts a `StyleDna` from a block of text.
//
// The text is normalized first (see `normalize.rs`), then measured:
// - words: whitespace-separated tokens
// - sentences: segments between runs of `.`, `!`, `?` that contain
//   something other than whitespace
// - entities: words starting with the `@` sigil, cleaned down to the sigil,
//   ASCII letters, digits and `-`, then uppercased
// - uppercase letters and symbols (anything not ASCII alphanumeric and not
//   whitespace), both counted over the normalized text
//
// Character classes are ASCII on purpose: the persisted corpus profile was
// computed that way, and accented letters count as symbols. Lengths are in
// chars.
//
// `analyze_corpus` fans documents out across the rayon pool; profiles share
// no state, so the only join point is collecting the results in input order.

use crate::dna::{GlitchPatterns, StyleDna};
use crate::normalize::normalize;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Prefix that marks an entity handle in MET4 text.
pub const ENTITY_SIGIL: char = '@';

static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Compute the Style DNA of `raw_text`. Empty input yields the zero profile.
pub fn analyze_text(raw_text: &str) -> StyleDna {
    let text = normalize(raw_text);
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = SENTENCE_BREAK_RE
        .split(&text)
        .filter(|s| !s.trim().is_empty())
        .count();

    let mut entity_registry: BTreeMap<String, u32> = BTreeMap::new();
    for word in &words {
        if let Some(handle) = entity_handle(word) {
            *entity_registry.entry(handle).or_insert(0) += 1;
        }
    }

    let vocabulary: BTreeSet<String> = words.iter().map(|w| w.to_lowercase()).collect();

    let mut char_count = 0usize;
    let mut upper_count = 0usize;
    let mut symbol_count = 0usize;
    for c in text.chars() {
        char_count += 1;
        if c.is_ascii_uppercase() {
            upper_count += 1;
        }
        if !c.is_ascii_alphanumeric() && !c.is_whitespace() {
            symbol_count += 1;
        }
    }

    let word_count = words.len();
    tracing::trace!(word_count, sentence_count, char_count, "analyzed text");

    StyleDna {
        entity_registry,
        vocabulary_size: vocabulary.len() as f64,
        avg_sentence_length: word_count as f64 / sentence_count.max(1) as f64,
        fragmentation_score: ratio(symbol_count, word_count) * 100.0,
        glitch_patterns: GlitchPatterns {
            caps_lock_ratio: ratio(upper_count, char_count),
            symbol_density: ratio(symbol_count, char_count),
        },
    }
}

/// Analyze many documents in parallel. Output order matches input order.
pub fn analyze_corpus<S: AsRef<str> + Sync>(docs: &[S]) -> Vec<StyleDna> {
    docs.par_iter().map(|d| analyze_text(d.as_ref())).collect()
}

/// Registry key for `word` if it is an entity token (sigil plus at least
/// one more character).
fn entity_handle(word: &str) -> Option<String> {
    let mut chars = word.chars();
    if chars.next() != Some(ENTITY_SIGIL) || chars.next().is_none() {
        return None;
    }
    Some(
        word.chars()
            .filter(|&c| c == ENTITY_SIGIL || c == '-' || c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect(),
    )
}

/// `part / whole`, or 0 when `whole` is 0.
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
