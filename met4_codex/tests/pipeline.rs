// End-to-end test of the codex pipeline.
//
// Corpus text -> analyze (in parallel) -> merge into a project profile ->
// generate synthetic text with a seeded RNG -> render a synthetic document ->
// analyze it -> compare against the baseline. Also checks that the project
// profile survives a JSON round trip in the persisted camelCase shape, the
// way it is stored between runs.

use met4_codex::document::{Seed, pick_seed, render_synthetic_document};
use met4_codex::{
    StyleDna, SyntheticGenerator, analyze_corpus, analyze_text, compare_fidelity, default_config,
    merge_dna, normalize,
};
use met4_prng::CodexRng;

const CORPUS: &[&str] = &[
    "— > SIKL 1 < —\r\n@APOLO sees @DAFNE by the river.   \r\nShe RUNS. He follows!\u{000C}\
     @DAFNE -- BARK-SKIN -- roots; leaves; silence.",
    "@NARSISVS leans over the water... @EKO repeats: water, water, WATER!\n\n\n\n\
     The flower opens. @NARSISVS is gone?",
    "@JOV watches.\n@MINERVA weaves; @VENVS laughs; @MARS sharpens the blade.",
];

fn seeds() -> Vec<Seed> {
    vec![
        Seed {
            id: "dafne".to_string(),
            title: "Apollo and Daphne".to_string(),
            source: "Ovid, Metamorphoses I".to_string(),
            text: "Apollo saw Daphne by the river and loved her. Daphne ran, and as \
                   Apollo reached her she became a laurel."
                .to_string(),
        },
        Seed {
            id: "eko".to_string(),
            title: "Echo and Narcissus".to_string(),
            source: "Ovid, Metamorphoses III".to_string(),
            text: "Echo could only repeat. Narcissus saw himself in the pool and \
                   wasted away; Echo faded to a voice."
                .to_string(),
        },
    ]
}

#[test]
fn full_pipeline_produces_bounded_report() {
    let docs = analyze_corpus(CORPUS);
    assert_eq!(docs.len(), CORPUS.len());

    let project = merge_dna(&docs);
    assert_eq!(project.entity_registry["@DAFNE"], 2);
    assert_eq!(project.entity_registry["@NARSISVS"], 2);
    assert_eq!(project.entity_registry["@MARS"], 1);
    assert!(project.fragmentation_score > 0.0);
    assert!(project.glitch_patterns.caps_lock_ratio > 0.0);

    let generator = SyntheticGenerator::new(default_config()).unwrap();
    let seeds = seeds();
    let mut rng = CodexRng::new(4);
    let seed = pick_seed(&seeds, &mut rng).unwrap();
    let synthetic = generator.generate(&seed.text, &project, &mut rng);
    let document = render_synthetic_document(seed, &synthetic);

    let synthetic_dna = analyze_text(&document);
    assert!(
        !synthetic_dna.entity_registry.is_empty(),
        "synthetic document should carry injected handles: {document}"
    );

    let report = compare_fidelity(&project, &synthetic_dna);
    assert_eq!(report.comparison.len(), 4);
    for m in &report.comparison {
        assert!((0.0..=100.0).contains(&m.accuracy), "{}: {}", m.name, m.accuracy);
    }
    assert!((0.0..=100.0).contains(&report.overall_fidelity));
    assert_eq!(report.synthetic_stats, synthetic_dna);
}

#[test]
fn pipeline_is_reproducible_for_a_fixed_seed() {
    let project = merge_dna(&analyze_corpus(CORPUS));
    let generator = SyntheticGenerator::new(default_config()).unwrap();
    let seeds = seeds();

    let run = |seed: u64| {
        let mut rng = CodexRng::new(seed);
        let chosen = pick_seed(&seeds, &mut rng).unwrap();
        render_synthetic_document(chosen, &generator.generate(&chosen.text, &project, &mut rng))
    };

    assert_eq!(run(11), run(11));
    assert_eq!(run(12345), run(12345));
}

#[test]
fn handles_survive_glitching_into_analysis() {
    // With no fragmentation and full caps, every handle the generator
    // injects is counted by the analyzer as-is.
    let dna = StyleDna::default().with_overrides(Some(0.0), Some(1.0));
    let generator = SyntheticGenerator::new(default_config()).unwrap();
    let mut rng = CodexRng::new(99);
    let out = generator.generate("Perseus met Minerva, and Minerva smiled.", &dna, &mut rng);

    assert_eq!(out, out.to_uppercase());
    let analyzed = analyze_text(&out);
    assert_eq!(analyzed.entity_registry["@PERSEVS"], 1);
    assert_eq!(analyzed.entity_registry["@MINERVA"], 2);
}

#[test]
fn project_profile_round_trips_through_json() {
    let project = merge_dna(&analyze_corpus(CORPUS));
    let json = project.to_json_pretty().unwrap();
    assert!(json.contains("\"entityRegistry\""));
    assert!(json.contains("\"capsLockRatio\""));
    let restored = StyleDna::from_json(&json).unwrap();
    assert_eq!(restored.entity_registry, project.entity_registry);
    assert!((restored.avg_sentence_length - project.avg_sentence_length).abs() < 1e-9);

    // A restored baseline compared with itself is a perfect match.
    assert_eq!(compare_fidelity(&restored, &restored).overall_fidelity, 100.0);
}

#[test]
fn normalization_is_stable_over_the_corpus() {
    for doc in CORPUS {
        let once = normalize(doc);
        assert_eq!(normalize(&once), once);
        assert_eq!(analyze_text(doc), analyze_text(&once));
    }
}
