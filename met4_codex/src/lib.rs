// MET4 codex: Style DNA analysis and synthetic "glitch" text generation.
//
// Measures the stylistic fingerprint of the MET4MORFOSES corpus, rewrites
// arbitrary text into the MET4 dialect using that fingerprint, and scores
// how closely a synthetic document matches the corpus baseline.
//
// Architecture:
// - `normalize.rs`: canonicalizes extracted text (line endings, markers, blank runs)
// - `dna.rs`: `StyleDna` value type and its JSON shape
// - `analyzer.rs`: computes a `StyleDna` from text, per document or per corpus
// - `aggregate.rs`: merges per-document profiles into a project profile
// - `ontology.rs`: `CodexConfig`: entity ontology, name table, flavor table
// - `generator.rs`: `SyntheticGenerator`, entity injection plus glitch mutation
// - `fidelity.rs`: compares a synthetic profile against a baseline
// - `document.rs`: seed texts, corpus manifests and the synthetic markdown artifacts
// - `error.rs`: `CodexError` for the loading paths
// - `main.rs`: the `codex` CLI (analyze / generate / expand / compare)
//
// Data flow: corpus text -> normalize -> analyze -> merge -> project DNA;
// project DNA + input text -> generate -> synthetic text -> analyze ->
// compare against the baseline.
//
// Determinism constraint: the only randomness is in `generator.rs` and
// `document.rs`, and all of it goes through `met4_prng::RandomSource`.

pub mod aggregate;
pub mod analyzer;
pub mod dna;
pub mod document;
pub mod error;
pub mod fidelity;
pub mod generator;
pub mod normalize;
pub mod ontology;

// Re-export key types at crate root for convenience.
pub use aggregate::merge_dna;
pub use analyzer::{analyze_corpus, analyze_text};
pub use dna::{GlitchPatterns, StyleDna};
pub use error::CodexError;
pub use fidelity::{FidelityReport, MetricComparison, compare_fidelity};
pub use generator::SyntheticGenerator;
pub use normalize::normalize;
pub use ontology::{CodexConfig, default_config};
