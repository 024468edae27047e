// MET4 codex CLI.
//
// Three subcommands mirror the corpus pipeline:
//   codex analyze <files...> [--out style-dna.json]
//       analyze each document, merge into the project DNA, write it as JSON
//   codex generate --dna style-dna.json (--input text.txt | --seeds seeds.json)
//       [--seed N] [--fragmentation F] [--caps-ratio C] [--ontology path] [--out file]
//       transform text into MET4 (a seed file yields a full synthetic document)
//   codex expand --dna style-dna.json --manifest corpus.json [--seed N]
//       [--ontology path] [--out-dir dir]
//       synthesize one sikl document per manifest entry
//   codex compare --baseline style-dna.json --synthetic doc.md [--out report.json]
//       score a synthetic document against the baseline profile
//
// Logging goes to stderr via tracing (`RUST_LOG` overrides the `info`
// default). JSON and generated text go to stdout unless `--out` is given.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use chrono::Utc;
use met4_codex::document::{
    expand_corpus_entry, load_corpus, load_seeds, pick_seed, render_synthetic_document,
};
use met4_codex::{
    CodexConfig, StyleDna, SyntheticGenerator, analyze_corpus, analyze_text, compare_fidelity,
    default_config, merge_dna,
};
use met4_prng::CodexRng;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "codex", about = "Style DNA analysis and MET4 text generation", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the project Style DNA from corpus text files
    Analyze {
        /// Plain-text corpus documents
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write the merged DNA here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Transform text into the MET4 dialect
    Generate {
        /// Style DNA profile to apply
        #[arg(long)]
        dna: PathBuf,
        /// Plain-text input to transform
        #[arg(long, conflicts_with = "seeds", required_unless_present = "seeds")]
        input: Option<PathBuf>,
        /// JSON array of seed passages; one is picked and rendered as a document
        #[arg(long)]
        seeds: Option<PathBuf>,
        /// RNG seed (defaults to the system clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Override the profile's fragmentation score
        #[arg(long)]
        fragmentation: Option<f64>,
        /// Override the profile's caps-lock ratio
        #[arg(long)]
        caps_ratio: Option<f64>,
        /// Ontology config to use instead of the built-in one
        #[arg(long)]
        ontology: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Synthesize sikl documents from a corpus manifest
    Expand {
        #[arg(long)]
        dna: PathBuf,
        /// JSON array of `{sikl, book, myths: [{id, title, summary}]}`
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        ontology: Option<PathBuf>,
        /// Write `sikl-N.md` files here instead of printing them
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Score a synthetic document against a baseline profile
    Compare {
        #[arg(long)]
        baseline: PathBuf,
        #[arg(long)]
        synthetic: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Analyze { files, out } => analyze(&files, out.as_deref()),
        Command::Generate {
            dna,
            input,
            seeds,
            seed,
            fragmentation,
            caps_ratio,
            ontology,
            out,
        } => {
            let profile = read_dna(&dna)?.with_overrides(fragmentation, caps_ratio);
            let generator = build_generator(ontology.as_deref())?;
            let mut rng = seeded_rng(seed);

            let text = match (input, seeds) {
                (Some(path), _) => {
                    let raw = read_text(&path)?;
                    generator.generate(&raw, &profile, &mut rng)
                }
                (None, Some(path)) => {
                    let seeds = load_seeds(&path)?;
                    let Some(chosen) = pick_seed(&seeds, &mut rng) else {
                        bail!("{} contains no seeds", path.display());
                    };
                    info!(id = %chosen.id, title = %chosen.title, "picked seed");
                    let synthetic = generator.generate(&chosen.text, &profile, &mut rng);
                    render_synthetic_document(chosen, &synthetic)
                }
                (None, None) => bail!("either --input or --seeds is required"),
            };
            emit(&text, out.as_deref())
        }
        Command::Expand {
            dna,
            manifest,
            seed,
            ontology,
            out_dir,
        } => {
            let profile = read_dna(&dna)?;
            let generator = build_generator(ontology.as_deref())?;
            let mut rng = seeded_rng(seed);
            let corpus = load_corpus(&manifest)?;
            info!(entries = corpus.len(), "expanding corpus");
            if let Some(dir) = &out_dir {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }

            for entry in &corpus {
                info!("generating {} (book {})", entry.slug(), entry.book);
                let document = expand_corpus_entry(&generator, entry, &profile, &mut rng);
                let out = out_dir
                    .as_ref()
                    .map(|dir| dir.join(format!("{}.md", entry.slug())));
                emit(&document, out.as_deref())?;
            }
            info!("expanded {} sikls", corpus.len());
            Ok(())
        }
        Command::Compare {
            baseline,
            synthetic,
            out,
        } => {
            let baseline = read_dna(&baseline)?;
            let synthetic_dna = analyze_text(&read_text(&synthetic)?);
            let report = compare_fidelity(&baseline, &synthetic_dna).stamped(Utc::now());
            for line in report.to_string().lines() {
                info!("{line}");
            }
            emit(&report.to_json_pretty()?, out.as_deref())
        }
    }
}

fn analyze(files: &[PathBuf], out: Option<&Path>) -> Result<()> {
    info!(documents = files.len(), "analyzing style DNA");
    let texts = files
        .iter()
        .map(|p| read_text(p))
        .collect::<Result<Vec<_>>>()?;

    let dnas = analyze_corpus(&texts);
    for (path, dna) in files.iter().zip(&dnas) {
        info!(
            "processed {}: found {} entities",
            path.display(),
            dna.entity_count()
        );
    }

    let project = merge_dna(&dnas);
    info!(
        "unique entities: {}, avg sentence length: {:.2} words",
        project.entity_count(),
        project.avg_sentence_length
    );
    emit(&project.to_json_pretty()?, out)
}

fn build_generator(ontology: Option<&Path>) -> Result<SyntheticGenerator> {
    let config = match ontology {
        Some(path) => CodexConfig::load(path)?,
        None => default_config(),
    };
    info!(mappings = config.ontology.mappings().len(), "loaded ontology");
    Ok(SyntheticGenerator::new(config)?)
}

/// RNG for a run; the seed is logged so the run can be repeated.
fn seeded_rng(seed: Option<u64>) -> CodexRng {
    let seed = seed.unwrap_or_else(clock_seed);
    info!(seed, "seeding generator");
    CodexRng::new(seed)
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_dna(path: &Path) -> Result<StyleDna> {
    let json = read_text(path)?;
    StyleDna::from_json(&json).with_context(|| format!("parsing style DNA {}", path.display()))
}

/// Write `content` to `out`, or print it.
fn emit(content: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
