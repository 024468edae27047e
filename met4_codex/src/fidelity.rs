// Fidelity comparison between a synthetic document and the corpus baseline.
//
// Four metrics are scored, in this order: average sentence length,
// fragmentation score, caps ratio, symbol density. The entity registry and
// vocabulary size are not scored. Each metric's accuracy is
//
//     100 - |baseline - synthetic| / baseline * 100, floored at 0
//
// with a zero baseline treated as magnitude 1, so a profile compared with
// itself always scores 100. Accuracy is also capped at 100 and NaN maps to
// 0, which keeps every score in [0, 100] for hand-edited profiles.
// The overall fidelity is the mean of the four accuracies.
//
// Scoring is pure; the caller stamps the report with its generation time
// when it is written out.

use crate::dna::StyleDna;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricComparison {
    pub name: String,
    pub baseline_value: f64,
    pub synthetic_value: f64,
    /// Percentage closeness, in [0, 100].
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FidelityReport {
    /// When the report was produced. Serialized as RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Mean accuracy across metrics, in percent.
    pub overall_fidelity: f64,
    pub comparison: Vec<MetricComparison>,
    /// Full profile of the synthetic document, kept for auditing.
    pub synthetic_stats: StyleDna,
}

/// Score `synthetic` against `baseline`.
pub fn compare_fidelity(baseline: &StyleDna, synthetic: &StyleDna) -> FidelityReport {
    let metrics = [
        (
            "Avg Sentence Length",
            baseline.avg_sentence_length,
            synthetic.avg_sentence_length,
        ),
        (
            "Fragmentation Score",
            baseline.fragmentation_score,
            synthetic.fragmentation_score,
        ),
        (
            "Caps Ratio",
            baseline.glitch_patterns.caps_lock_ratio,
            synthetic.glitch_patterns.caps_lock_ratio,
        ),
        (
            "Symbol Density",
            baseline.glitch_patterns.symbol_density,
            synthetic.glitch_patterns.symbol_density,
        ),
    ];

    let comparison: Vec<MetricComparison> = metrics
        .iter()
        .map(|&(name, base, synth)| MetricComparison {
            name: name.to_string(),
            baseline_value: base,
            synthetic_value: synth,
            accuracy: accuracy(base, synth),
        })
        .collect();

    let overall_fidelity =
        comparison.iter().map(|m| m.accuracy).sum::<f64>() / comparison.len() as f64;

    FidelityReport {
        generated_at: None,
        overall_fidelity,
        comparison,
        synthetic_stats: synthetic.clone(),
    }
}

fn accuracy(base: f64, synth: f64) -> f64 {
    let delta = (base - synth).abs();
    let magnitude = if base == 0.0 || base.is_nan() { 1.0 } else { base };
    let score = 100.0 - (delta / magnitude) * 100.0;
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

impl FidelityReport {
    pub fn stamped(self, at: DateTime<Utc>) -> Self {
        FidelityReport {
            generated_at: Some(at),
            ..self
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for FidelityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Overall Style Match = {:.2}%", self.overall_fidelity)?;
        for m in &self.comparison {
            writeln!(f, "  - {}: {:.1}% match", m.name, m.accuracy)?;
        }
        Ok(())
    }
}
