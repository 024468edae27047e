// Merges per-document Style DNA into a single project profile.
//
// Entity counts are cumulative (total corpus occurrences). Every other field
// is the per-document arithmetic mean, `vocabulary_size` included: distinct
// word counts are averaged, not recomputed over a merged vocabulary. The
// persisted project profile was built this way and the generator is tuned
// against it, so keep this semantics.

use crate::dna::StyleDna;

/// Merge `dnas` into one profile. An empty slice yields the zero profile.
pub fn merge_dna(dnas: &[StyleDna]) -> StyleDna {
    let mut merged = StyleDna::default();
    if dnas.is_empty() {
        return merged;
    }

    for dna in dnas {
        for (handle, count) in &dna.entity_registry {
            *merged.entity_registry.entry(handle.clone()).or_insert(0) += count;
        }
        merged.vocabulary_size += dna.vocabulary_size;
        merged.avg_sentence_length += dna.avg_sentence_length;
        merged.fragmentation_score += dna.fragmentation_score;
        merged.glitch_patterns.caps_lock_ratio += dna.glitch_patterns.caps_lock_ratio;
        merged.glitch_patterns.symbol_density += dna.glitch_patterns.symbol_density;
    }

    let n = dnas.len() as f64;
    merged.vocabulary_size /= n;
    merged.avg_sentence_length /= n;
    merged.fragmentation_score /= n;
    merged.glitch_patterns.caps_lock_ratio /= n;
    merged.glitch_patterns.symbol_density /= n;

    tracing::debug!(
        documents = dnas.len(),
        entities = merged.entity_registry.len(),
        "merged style DNA"
    );
    merged
}
