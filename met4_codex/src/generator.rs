// Synthetic MET4 text generator.
//
// Rewrites arbitrary input text into the MET4 dialect in two phases:
//
// Phase A, entity injection (`inject_entities`): for every ontology mapping,
// in declaration order, the handle's human name is matched as a
// case-insensitive whole word and every match is replaced by the handle
// (`Apollo` -> `@APOLO`). Word boundaries and case folding are ASCII-only,
// matching the character classes the analyzer uses. After a successful
// replacement, with probability `FLAVOR_PROBABILITY`, a flavor phrase from
// the mapping's category is appended in brackets after the first occurrence
// of the handle (`@APOLO [sky-fire]`). Mappings see the text left by
// earlier mappings.
//
// Phase B, glitch application (`apply_glitch`): the text is split into
// words. After each word, one roll in [0, 100) may push a paragraph break
// (roll < fragmentation / 6) or a wide space (roll < fragmentation / 2), and
// a second roll uppercases the last pushed token when it falls below
// `caps_lock_ratio * 100`. The last pushed token is the break/space token if
// one was just inserted, so in that case the word keeps its casing. Tokens
// are joined with single spaces and the result is trimmed.
//
// All randomness comes from the caller's `RandomSource`. Draw order:
// Phase A draws one value per mapping that matched, plus one index draw
// when a flavor is injected; Phase B draws exactly two values per word.
// The DNA is applied as given, so hand-tuned knobs work without re-analysis.

use crate::dna::StyleDna;
use crate::error::CodexError;
use crate::ontology::CodexConfig;
use met4_prng::RandomSource;
use regex::{NoExpand, Regex};

/// Chance that a matched entity gets a flavor phrase.
pub const FLAVOR_PROBABILITY: f64 = 0.25;

/// Token pushed for a fragmentation break.
pub const PARAGRAPH_BREAK: &str = "\n\n";

/// Token pushed for extra spacing.
pub const WIDE_SPACE: &str = "   ";

/// A compiled whole-word matcher for one ontology mapping.
#[derive(Debug, Clone)]
struct EntityPattern {
    handle: String,
    category: String,
    regex: Regex,
}

/// Generator bound to one `CodexConfig`.
///
/// Construction compiles one pattern per mapping; `generate` can then be
/// called any number of times with different DNA profiles and RNGs.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    config: CodexConfig,
    patterns: Vec<EntityPattern>,
}

impl SyntheticGenerator {
    pub fn new(config: CodexConfig) -> Result<Self, CodexError> {
        let mut patterns = Vec::with_capacity(config.ontology.mappings().len());
        for mapping in config.ontology.mappings() {
            let name = config.display_name(&mapping.handle);
            if name.is_empty() {
                // A bare-sigil handle would match every word boundary.
                tracing::warn!(handle = %mapping.handle, "skipping mapping with empty name");
                continue;
            }
            let regex = Regex::new(&format!(
                r"(?-u:\b)(?i-u:{})(?-u:\b)",
                regex::escape(name)
            ))?;
            patterns.push(EntityPattern {
                handle: mapping.handle.clone(),
                category: mapping.category.clone(),
                regex,
            });
        }
        Ok(SyntheticGenerator { config, patterns })
    }

    /// Transform `input` into MET4 text shaped by `dna`.
    pub fn generate<R: RandomSource>(&self, input: &str, dna: &StyleDna, rng: &mut R) -> String {
        let injected = self.inject_entities(input, rng);
        let output = apply_glitch(&injected, dna, rng);
        tracing::debug!(
            input_len = input.len(),
            output_len = output.len(),
            "generated synthetic text"
        );
        output
    }

    /// Phase A: replace known names with handles, maybe adding flavor tags.
    pub fn inject_entities<R: RandomSource>(&self, input: &str, rng: &mut R) -> String {
        let mut text = input.to_string();
        for pattern in &self.patterns {
            if !pattern.regex.is_match(&text) {
                continue;
            }
            text = pattern
                .regex
                .replace_all(&text, NoExpand(&pattern.handle))
                .into_owned();

            if rng.random_bool(FLAVOR_PROBABILITY) {
                let flavors = self.config.flavors.flavors_for(&pattern.category);
                let flavor = flavors[rng.range_usize(0, flavors.len())];
                let tagged = format!("{} [{}]", pattern.handle, flavor);
                text = text.replacen(&pattern.handle, &tagged, 1);
            }
        }
        text
    }
}

/// Phase B: DNA-driven fragmentation, spacing and capitalization.
pub fn apply_glitch<R: RandomSource>(text: &str, dna: &StyleDna, rng: &mut R) -> String {
    let break_below = dna.fragmentation_score / 6.0;
    let space_below = dna.fragmentation_score / 2.0;
    let caps_below = dna.glitch_patterns.caps_lock_ratio * 100.0;

    let mut tokens: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        tokens.push(word.to_string());

        let roll = rng.next_f64() * 100.0;
        if roll < break_below {
            tokens.push(PARAGRAPH_BREAK.to_string());
        } else if roll < space_below {
            tokens.push(WIDE_SPACE.to_string());
        }

        if rng.next_f64() * 100.0 < caps_below {
            let last = tokens.len() - 1;
            tokens[last] = tokens[last].to_uppercase();
        }
    }

    tokens.join(" ").trim().to_string()
}
