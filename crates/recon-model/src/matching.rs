use serde::{Deserialize, Serialize};

use crate::catalog::Record;

/// Per-source-record alignment state.
///
/// Exactly one entry exists per source record for the lifetime of a
/// catalog pair. Entries are never removed; unmatch/rematch cycles only
/// mutate `target_item`, `is_matched`, and `confidence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEntry {
    /// The source record this entry tracks.
    pub source_item: Record,
    /// The currently paired target record, if any.
    pub target_item: Option<Record>,
    /// Similarity score (0-100) against the paired target when matched,
    /// or the best candidate seen during alignment when unmatched.
    pub confidence: f32,
    /// True iff `target_item` is present.
    pub is_matched: bool,
    /// Source category id; fixed at creation.
    pub category_id: String,
}

impl MatchEntry {
    /// Create an unmatched entry, retaining the best candidate score
    /// for display.
    pub fn unmatched(source_item: Record, best_confidence: f32, category_id: String) -> Self {
        Self {
            source_item,
            target_item: None,
            confidence: best_confidence,
            is_matched: false,
            category_id,
        }
    }

    /// Pair this entry with a target record at the given confidence.
    pub fn set_target(&mut self, target: Record, confidence: f32) {
        self.target_item = Some(target);
        self.confidence = confidence;
        self.is_matched = true;
    }

    /// Revert this entry to the unmatched state, keeping the last
    /// confidence for display.
    pub fn clear_target(&mut self) {
        self.target_item = None;
        self.is_matched = false;
    }

    /// Id of the currently held target, if matched.
    pub fn target_id(&self) -> Option<&str> {
        self.target_item.as_ref().map(|t| t.id.as_str())
    }
}

/// One row of a serialized match-set snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedPair {
    pub source_id: String,
    pub source_name: String,
    pub target_id: Option<String>,
    pub target_name: Option<String>,
    pub confidence: f32,
    pub matched: bool,
    pub category_id: String,
}

impl From<&MatchEntry> for MatchedPair {
    fn from(entry: &MatchEntry) -> Self {
        Self {
            source_id: entry.source_item.id.clone(),
            source_name: entry.source_item.name.clone(),
            target_id: entry.target_item.as_ref().map(|t| t.id.clone()),
            target_name: entry.target_item.as_ref().map(|t| t.name.clone()),
            confidence: entry.confidence,
            matched: entry.is_matched,
            category_id: entry.category_id.clone(),
        }
    }
}

/// Serializable snapshot of a full match set, for persistence and review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSetConfig {
    /// Identifies the catalog pair this snapshot belongs to.
    pub label: String,
    /// All entries, matched and unmatched, in source order.
    pub entries: Vec<MatchedPair>,
}

impl MatchSetConfig {
    /// Count of matched entries.
    pub fn matched_count(&self) -> usize {
        self.entries.iter().filter(|e| e.matched).count()
    }

    /// Count of unmatched entries.
    pub fn unmatched_count(&self) -> usize {
        self.entries.len() - self.matched_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            price: None,
        }
    }

    #[test]
    fn set_and_clear_target_keep_flag_consistent() {
        let mut entry = MatchEntry::unmatched(record("s1", "Soup"), 42.0, "c1".to_string());
        assert!(!entry.is_matched);
        assert!(entry.target_item.is_none());

        entry.set_target(record("t1", "Soup"), 100.0);
        assert!(entry.is_matched);
        assert_eq!(entry.target_id(), Some("t1"));
        assert_eq!(entry.confidence, 100.0);

        entry.clear_target();
        assert!(!entry.is_matched);
        assert!(entry.target_item.is_none());
    }

    #[test]
    fn config_counts() {
        let mut entry = MatchEntry::unmatched(record("s1", "Soup"), 0.0, "c1".to_string());
        entry.set_target(record("t1", "Soup"), 100.0);
        let other = MatchEntry::unmatched(record("s2", "Salad"), 55.0, "c1".to_string());

        let config = MatchSetConfig {
            label: "demo".to_string(),
            entries: vec![(&entry).into(), (&other).into()],
        };
        assert_eq!(config.matched_count(), 1);
        assert_eq!(config.unmatched_count(), 1);
    }
}
