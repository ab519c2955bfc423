//! Repository for persisting match-set snapshots.
//!
//! Stores [`MatchSetConfig`] snapshots as JSON files so an operator's
//! reconciliation decisions can be reviewed or resumed across runs.
//! Files are named `{label}.json` after a normalized catalog-pair label.
//! The target catalog itself is never persisted here; that stays with
//! the host.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use recon_model::MatchSetConfig;

/// Directory-backed store of match-set snapshots.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    base_dir: PathBuf,
}

/// Metadata about a stored match set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSetMetadata {
    /// Catalog-pair label the snapshot belongs to.
    pub label: String,
    /// File path where the snapshot is stored.
    pub file_path: PathBuf,
    /// Total entries in the snapshot.
    pub entry_count: usize,
    /// Entries that were matched at save time.
    pub matched_count: usize,
}

/// Match-set snapshot with repository metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMatchSet {
    /// The snapshot itself.
    #[serde(flatten)]
    pub config: MatchSetConfig,
    /// When this snapshot was saved (ISO 8601).
    pub saved_at: Option<String>,
    /// Optional operator notes.
    pub description: Option<String>,
    /// Snapshot format version.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredMatchSet {
    /// Wrap a snapshot with fresh metadata.
    pub fn new(config: MatchSetConfig) -> Self {
        Self {
            config,
            saved_at: Some(timestamp()),
            description: None,
            version: default_version(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Current timestamp in ISO 8601 format.
fn timestamp() -> String {
    // Simple timestamp without external dependency
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        1970 + secs / 31536000,
        (secs % 31536000) / 2592000 + 1,
        (secs % 2592000) / 86400 + 1,
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

impl MatchRepository {
    /// Open (creating if needed) a repository at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!("Failed to create match repository: {}", base_dir.display())
        })?;
        Ok(Self { base_dir })
    }

    /// Base directory of this repository.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save a snapshot, returning the file path written.
    pub fn save(&self, config: &MatchSetConfig) -> Result<PathBuf> {
        let stored = StoredMatchSet::new(config.clone());
        self.save_stored(&stored)
    }

    /// Save a snapshot with its metadata wrapper.
    pub fn save_stored(&self, stored: &StoredMatchSet) -> Result<PathBuf> {
        let filename = snapshot_filename(&stored.config.label);
        let path = self.base_dir.join(&filename);
        let json = serde_json::to_string_pretty(stored)
            .with_context(|| format!("Failed to serialize match set for {filename}"))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write match set to {}", path.display()))?;
        Ok(path)
    }

    /// Load a snapshot by label. Returns `None` if it does not exist.
    pub fn load(&self, label: &str) -> Result<Option<MatchSetConfig>> {
        let stored = self.load_stored(label)?;
        Ok(stored.map(|s| s.config))
    }

    /// Load a snapshot with its metadata wrapper.
    pub fn load_stored(&self, label: &str) -> Result<Option<StoredMatchSet>> {
        let path = self.base_dir.join(snapshot_filename(label));
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read match set from {}", path.display()))?;
        let stored: StoredMatchSet = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse match set from {}", path.display()))?;
        Ok(Some(stored))
    }

    /// List all stored match sets, sorted by label.
    pub fn list(&self) -> Result<Vec<MatchSetMetadata>> {
        let mut metadata = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if !filename.ends_with(".json") {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            if let Ok(stored) = serde_json::from_str::<StoredMatchSet>(&contents) {
                metadata.push(MatchSetMetadata {
                    label: stored.config.label.clone(),
                    file_path: path,
                    entry_count: stored.config.entries.len(),
                    matched_count: stored.config.matched_count(),
                });
            }
        }
        metadata.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(metadata)
    }

    /// Delete a stored match set. Returns false if it did not exist.
    pub fn delete(&self, label: &str) -> Result<bool> {
        let path = self.base_dir.join(snapshot_filename(label));
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete match set: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Check whether a snapshot exists for a label.
    pub fn exists(&self, label: &str) -> bool {
        self.base_dir.join(snapshot_filename(label)).exists()
    }
}

fn snapshot_filename(label: &str) -> String {
    format!("{}.json", normalize_label(label))
}

/// Normalize a label for use in filenames.
fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
