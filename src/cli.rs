//! Command-line interface for the retreer.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use crate::config::{RunConfig, DEFAULT_OUTPUT_DIR};
use crate::conllu::Document;
use crate::error::{Result, RetreeError};
use crate::retree::{Resources, RetreeStats, Retreer};

/// Split CoNLL-U words into morphological trees.
#[derive(Parser, Debug)]
#[command(name = "retree")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Span-tagged segmentation lexicon (.useg)
    pub lexicon: PathBuf,

    /// Inflection lexicon (lemma, form, features, segmentation)
    pub inflection: PathBuf,

    /// Treebank to split (.conllu)
    pub treebank: PathBuf,

    /// Supervised segmentation corpus, tried before the lexicons
    #[arg(short, long)]
    pub corpus: Option<PathBuf>,

    /// Morph-to-feature alignment table
    #[arg(short, long)]
    pub alignments: Option<PathBuf>,

    /// Output root directory
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub out_dir: PathBuf,

    /// Strip diacritics from inflection data
    #[arg(long)]
    pub fold_diacritics: bool,

    /// Print planned splits instead of writing a treebank
    #[arg(long)]
    pub dry_run: bool,

    /// Print dry-run plans as JSON
    #[arg(short, long, requires = "dry_run")]
    pub json: bool,
}

impl Cli {
    pub fn config(&self) -> RunConfig {
        RunConfig {
            lexicon: self.lexicon.clone(),
            inflection: self.inflection.clone(),
            corpus: self.corpus.clone(),
            alignments: self.alignments.clone(),
            treebank: self.treebank.clone(),
            output_dir: self.out_dir.clone(),
            fold_diacritics: self.fold_diacritics,
        }
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    if cli.dry_run {
        return plan_command(&config, cli.json);
    }

    let (path, stats) = retree_treebank(&config)?;
    println!("Split {} of {} words", stats.split(), stats.words);
    println!(
        "  corpus: {}  lexicon: {}  inflection: {}",
        stats.split_corpus, stats.split_lexicon, stats.split_inflection
    );
    if stats.feats_nulled > 0 {
        println!("  features nulled: {}", stats.feats_nulled);
    }
    println!("Saved to: {}", path.display());
    Ok(())
}

fn read_treebank(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| RetreeError::io(path, e))?;
    Document::parse(&content)
}

/// Split the configured treebank and write it under the output directory.
///
/// Returns the written path and the run counters.
pub fn retree_treebank(config: &RunConfig) -> Result<(PathBuf, RetreeStats)> {
    let retreer = Retreer::new(Resources::load(config)?);
    let mut doc = read_treebank(&config.treebank)?;
    let stats = retreer.process_document(&mut doc)?;

    let path = config.output_path();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| RetreeError::io(dir, e))?;
    }
    fs::write(&path, doc.to_conllu_string()).map_err(|e| RetreeError::io(&path, e))?;
    info!(path = %path.display(), "wrote treebank");

    Ok((path, stats))
}

/// Print the directives a run would apply.
fn plan_command(config: &RunConfig, json: bool) -> Result<()> {
    let retreer = Retreer::new(Resources::load(config)?);
    let doc = read_treebank(&config.treebank)?;
    let planned = retreer.plan_document(&doc);

    if json {
        println!("{}", serde_json::to_string_pretty(&planned)?);
    } else {
        for plan in &planned {
            println!(
                "{}:{}\t{}\t{}",
                plan.sentence, plan.word_id, plan.form, plan.directive
            );
        }
    }
    Ok(())
}
