use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use recon_match::{MatchEngine, MatchRepository, MatchSetMetadata, Suggestion};
use recon_model::Catalog;

use crate::cli::{AlignArgs, SetsArgs, SuggestArgs};

/// Result of an `align` run, handed to the summary printer.
pub struct AlignOutcome {
    pub engine: MatchEngine,
    pub label: String,
    pub saved_to: Option<PathBuf>,
}

pub fn run_align(args: &AlignArgs) -> Result<AlignOutcome> {
    let span = info_span!("align");
    let _guard = span.enter();

    let source = load_catalog(&args.source)?;
    let target = load_catalog(&args.target)?;
    let engine = MatchEngine::new(source, target);

    let summary = engine.summary();
    info!(
        sources = summary.total_sources,
        matched = summary.matched,
        unmatched = summary.unmatched,
        "alignment finished"
    );

    let label = args
        .label
        .clone()
        .unwrap_or_else(|| derive_label(&args.source, &args.target));

    let saved_to = match &args.save_dir {
        Some(dir) => {
            let repo = MatchRepository::new(dir)?;
            let path = repo.save(&engine.to_config(&label))?;
            info!(path = %path.display(), "match set saved");
            Some(path)
        }
        None => None,
    };

    Ok(AlignOutcome {
        engine,
        label,
        saved_to,
    })
}

/// Result of a `suggest` run: the source record's name plus its ranked
/// candidates.
pub struct SuggestOutcome {
    pub source_name: String,
    pub suggestions: Vec<Suggestion>,
}

pub fn run_suggest(args: &SuggestArgs) -> Result<SuggestOutcome> {
    let source = load_catalog(&args.source)?;
    let target = load_catalog(&args.target)?;
    let engine = MatchEngine::new(source, target);

    let Some(entry) = engine.get_match(&args.item) else {
        bail!("source record '{}' not found in {}", args.item, args.source.display());
    };
    Ok(SuggestOutcome {
        source_name: entry.source_item.name.clone(),
        suggestions: engine.suggest(&args.item),
    })
}

pub fn run_sets(args: &SetsArgs) -> Result<Vec<MatchSetMetadata>> {
    let repo = MatchRepository::new(&args.dir)?;
    repo.list()
}

fn load_catalog(path: &Path) -> Result<Catalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
    catalog
        .validate()
        .with_context(|| format!("Invalid catalog: {}", path.display()))?;
    Ok(catalog)
}

/// Build a match-set label from the two catalog file stems.
fn derive_label(source: &Path, target: &Path) -> String {
    let stem = |p: &Path| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("catalog")
            .to_string()
    };
    format!("{}-{}", stem(source), stem(target))
}
