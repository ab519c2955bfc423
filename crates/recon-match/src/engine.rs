//! Match engine: owns the per-source-record alignment state and the
//! commands that mutate it.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use recon_model::{CREATED_ID_PREFIX, Catalog, Category, MatchEntry, MatchSetConfig, Record};

use crate::error::MatchError;
use crate::score::{ConfidenceLevel, ConfidenceThresholds, score};

/// Suggestions below or at this score are discarded.
const SUGGESTION_MIN_CONFIDENCE: f32 = 30.0;
/// Maximum number of suggestions returned per source record.
const SUGGESTION_LIMIT: usize = 3;

/// Outcome of a mutating command.
///
/// Not-found conditions degrade to [`CommandStatus::NoOp`] rather than
/// raising, to tolerate races between host UI state and engine state
/// (e.g., a stale selection after a deletion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command mutated the match set.
    Applied,
    /// The command resolved nothing and left state unchanged.
    NoOp,
}

/// A change to the target catalog that the host must mirror into its
/// authoritative copy. The engine applies the same change to its own
/// target view before returning the delta.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogDelta {
    /// A synthesized counterpart was appended to a target category.
    RecordAdded { category_id: String, record: Record },
    /// A record was removed from a target category.
    RecordRemoved {
        category_id: String,
        record_id: String,
    },
}

/// A ranked candidate target record for manual confirmation.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The candidate target record.
    pub item: Record,
    /// Similarity score against the source record's name.
    pub confidence: f32,
}

/// Matched and unmatched entries of one category, in source item order.
#[derive(Debug, Default)]
pub struct MatchListing<'a> {
    pub matched: Vec<&'a MatchEntry>,
    pub unmatched: Vec<&'a MatchEntry>,
}

/// Summary counts over the whole match set.
#[derive(Debug, Clone, Copy)]
pub struct MatchSummary {
    /// Total source records tracked (one entry each).
    pub total_sources: usize,
    /// Entries currently paired with a target record.
    pub matched: usize,
    /// Entries without a target record.
    pub unmatched: usize,
    /// Matched entries whose target was synthesized by the engine.
    pub created_targets: usize,
}

/// Engine reconciling a source catalog against a target catalog.
///
/// Construction runs the initial alignment exactly once; it is never
/// re-run implicitly. Handing the engine updated catalogs means building
/// a new engine (or calling [`MatchEngine::realign`], which explicitly
/// discards operator decisions). Thereafter the host issues the four
/// commands (`manual_match`, `unmatch`, `create_counterpart`,
/// `delete_counterpart`) and reads derived projections.
///
/// A secondary index from target id to source id backs the one-to-one
/// invariant: at most one entry holds a given target record, enforced at
/// every mutation rather than by scanning.
///
/// Single-operator, synchronous; every operation runs to completion and
/// each command observes the full effect of all prior commands.
pub struct MatchEngine {
    source: Catalog,
    target: Catalog,
    /// One entry per source record, keyed by source id.
    entries: BTreeMap<String, MatchEntry>,
    /// Claim index: target id -> source id currently holding it.
    claims: BTreeMap<String, String>,
    /// Category correspondence, evaluated once per source category:
    /// equal id, else equal name, else none.
    correspondence: BTreeMap<String, Option<String>>,
    next_created: u64,
}

impl MatchEngine {
    /// Build an engine for a catalog pair and run the initial alignment.
    pub fn new(source: Catalog, target: Catalog) -> Self {
        let mut engine = Self {
            source,
            target,
            entries: BTreeMap::new(),
            claims: BTreeMap::new(),
            correspondence: BTreeMap::new(),
            next_created: 0,
        };
        engine.align();
        engine
    }

    /// Rebuild the match set from scratch against the current catalogs.
    ///
    /// This discards every operator decision (manual matches, unmatches)
    /// and must only be invoked deliberately by the host; the engine
    /// never triggers it from a data change. Counterparts previously
    /// appended to the target view survive and participate in the new
    /// alignment like any other target record.
    pub fn realign(&mut self) {
        self.align();
    }

    fn align(&mut self) {
        self.correspondence.clear();
        for category in &self.source.categories {
            let target_category = self
                .target
                .category(&category.id)
                .or_else(|| self.target.category_by_name(&category.name));
            self.correspondence
                .insert(category.id.clone(), target_category.map(|c| c.id.clone()));
        }

        let mut entries = BTreeMap::new();
        let mut claims: BTreeMap<String, String> = BTreeMap::new();
        for category in &self.source.categories {
            let target_category = self
                .correspondence
                .get(&category.id)
                .and_then(|t| t.as_deref())
                .and_then(|id| self.target.category(id));
            for item in &category.items {
                // Best candidate in target order; strict comparison keeps
                // the first-encountered record on ties.
                let mut best: Option<(&Record, f32)> = None;
                if let Some(target_category) = target_category {
                    for candidate in &target_category.items {
                        let candidate_score = score(&item.name, &candidate.name);
                        if best.is_none_or(|(_, held)| candidate_score > held) {
                            best = Some((candidate, candidate_score));
                        }
                    }
                }
                let best_confidence = best.map_or(0.0, |(_, s)| s);
                let mut entry =
                    MatchEntry::unmatched(item.clone(), best_confidence, category.id.clone());
                if let Some((candidate, candidate_score)) = best
                    && candidate_score >= 100.0
                    && !claims.contains_key(&candidate.id)
                {
                    claims.insert(candidate.id.clone(), item.id.clone());
                    entry.set_target(candidate.clone(), candidate_score);
                }
                entries.insert(item.id.clone(), entry);
            }
        }
        self.entries = entries;
        self.claims = claims;
        debug!(
            sources = self.entries.len(),
            auto_matched = self.claims.len(),
            "alignment complete"
        );
    }

    /// The source catalog this engine was built from.
    pub fn source(&self) -> &Catalog {
        &self.source
    }

    /// The engine's view of the target catalog, including counterparts
    /// appended by `create_counterpart` and minus deleted records. The
    /// host keeps its authoritative catalog in sync by applying the
    /// emitted [`CatalogDelta`]s.
    pub fn target_view(&self) -> &Catalog {
        &self.target
    }

    /// The match entry for a source record, if the record exists.
    pub fn get_match(&self, source_item_id: &str) -> Option<&MatchEntry> {
        self.entries.get(source_item_id)
    }

    /// Matched and unmatched entries of a source category, in the
    /// category's item order.
    pub fn list_matches(&self, category_id: &str) -> MatchListing<'_> {
        let mut listing = MatchListing::default();
        if let Some(category) = self.source.category(category_id) {
            for item in &category.items {
                if let Some(entry) = self.entries.get(&item.id) {
                    if entry.is_matched {
                        listing.matched.push(entry);
                    } else {
                        listing.unmatched.push(entry);
                    }
                }
            }
        }
        listing
    }

    /// Target records of the category corresponding to `category_id`
    /// that no entry currently holds.
    pub fn list_unmatched_targets(&self, category_id: &str) -> Vec<&Record> {
        self.target_category_for(category_id)
            .map(|category| {
                category
                    .items
                    .iter()
                    .filter(|item| !self.claims.contains_key(&item.id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ranked candidate targets for an unmatched source record.
    ///
    /// Candidates are restricted to unclaimed records in the
    /// corresponding target category, scored fresh on every call,
    /// filtered above 30, sorted by descending confidence (ties keep
    /// target item order), and capped at three.
    pub fn suggest(&self, source_item_id: &str) -> Vec<Suggestion> {
        let Some(entry) = self.entries.get(source_item_id) else {
            return Vec::new();
        };
        let Some(target_category) = self.target_category_for(&entry.category_id) else {
            return Vec::new();
        };
        let mut ranked: Vec<Suggestion> = target_category
            .items
            .iter()
            .filter(|item| !self.claims.contains_key(&item.id))
            .map(|item| Suggestion {
                confidence: score(&entry.source_item.name, &item.name),
                item: item.clone(),
            })
            .filter(|suggestion| suggestion.confidence > SUGGESTION_MIN_CONFIDENCE)
            .collect();
        ranked.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(SUGGESTION_LIMIT);
        ranked
    }

    /// True when the corresponding target category already contains a
    /// record with the source record's name (case-insensitive, trimmed).
    /// This is the guard `create_counterpart` enforces.
    pub fn exists_in_target(&self, source_item_id: &str) -> bool {
        let Some(entry) = self.entries.get(source_item_id) else {
            return false;
        };
        self.target_category_for(&entry.category_id)
            .is_some_and(|category| category.item_by_name(&entry.source_item.name).is_some())
    }

    /// Pair a source record with a target record chosen by the operator.
    ///
    /// Confidence is recomputed from the two names. The previous claim
    /// held by this entry, if any, is released. Returns
    /// [`CommandStatus::NoOp`] when the source entry or the target record
    /// (in the corresponding category) cannot be resolved, and
    /// [`MatchError::TargetAlreadyClaimed`] when another entry holds the
    /// target; re-confirming an entry's own target is `Applied`.
    pub fn manual_match(
        &mut self,
        source_item_id: &str,
        target_item_id: &str,
    ) -> Result<CommandStatus, MatchError> {
        let (category_id, source_name, previous_target) = match self.entries.get(source_item_id) {
            Some(entry) => (
                entry.category_id.clone(),
                entry.source_item.name.clone(),
                entry.target_id().map(String::from),
            ),
            None => return Ok(CommandStatus::NoOp),
        };
        let Some(target) = self
            .target_category_for(&category_id)
            .and_then(|category| category.item(target_item_id))
            .cloned()
        else {
            return Ok(CommandStatus::NoOp);
        };
        if let Some(claimed_by) = self.claims.get(&target.id)
            && claimed_by != source_item_id
        {
            return Err(MatchError::TargetAlreadyClaimed {
                target_id: target.id.clone(),
                claimed_by: claimed_by.clone(),
            });
        }

        if let Some(previous) = previous_target {
            self.claims.remove(&previous);
        }
        let confidence = score(&source_name, &target.name);
        self.claims
            .insert(target.id.clone(), source_item_id.to_string());
        debug!(
            source = source_item_id,
            target = %target.id,
            confidence,
            "manual match"
        );
        if let Some(entry) = self.entries.get_mut(source_item_id) {
            entry.set_target(target, confidence);
        }
        Ok(CommandStatus::Applied)
    }

    /// Release the target record from whichever entry holds it.
    ///
    /// Idempotent: unmatching an unclaimed target is a no-op.
    pub fn unmatch(&mut self, target_item_id: &str) -> CommandStatus {
        match self.claims.remove(target_item_id) {
            Some(source_id) => {
                if let Some(entry) = self.entries.get_mut(&source_id) {
                    entry.clear_target();
                }
                debug!(source = %source_id, target = target_item_id, "unmatched");
                CommandStatus::Applied
            }
            None => CommandStatus::NoOp,
        }
    }

    /// Synthesize a target counterpart for a source record.
    ///
    /// The new record copies the source record's fields under a fresh
    /// `created-` id, is appended to the engine's target view, and is
    /// paired with the source entry at confidence 100. Returns the delta
    /// the host must apply to its authoritative target catalog, `None`
    /// when the source entry or a corresponding target category is
    /// missing (no-op), and [`MatchError::DuplicateName`] when the
    /// target category already has a record with this name.
    pub fn create_counterpart(
        &mut self,
        source_item_id: &str,
    ) -> Result<Option<CatalogDelta>, MatchError> {
        let (category_id, source_record, previous_target) = match self.entries.get(source_item_id)
        {
            Some(entry) => (
                entry.category_id.clone(),
                entry.source_item.clone(),
                entry.target_id().map(String::from),
            ),
            None => return Ok(None),
        };
        let Some(target_category_id) = self
            .correspondence
            .get(&category_id)
            .cloned()
            .flatten()
        else {
            return Ok(None);
        };
        if let Some(category) = self.target.category(&target_category_id)
            && category.item_by_name(&source_record.name).is_some()
        {
            return Err(MatchError::DuplicateName {
                name: source_record.name,
                category_id: target_category_id,
            });
        }

        self.next_created += 1;
        let record = Record {
            id: format!("{CREATED_ID_PREFIX}{}", self.next_created),
            name: source_record.name,
            description: source_record.description,
            price: source_record.price,
        };
        if let Some(category) = self
            .target
            .categories
            .iter_mut()
            .find(|c| c.id == target_category_id)
        {
            category.items.push(record.clone());
        }
        if let Some(previous) = previous_target {
            self.claims.remove(&previous);
        }
        self.claims
            .insert(record.id.clone(), source_item_id.to_string());
        if let Some(entry) = self.entries.get_mut(source_item_id) {
            entry.set_target(record.clone(), 100.0);
        }
        debug!(
            source = source_item_id,
            created = %record.id,
            category = %target_category_id,
            "created counterpart"
        );
        Ok(Some(CatalogDelta::RecordAdded {
            category_id: target_category_id,
            record,
        }))
    }

    /// Remove a record from the engine's target view, unmatching it
    /// first if an entry holds it.
    ///
    /// Returns the delta the host must apply, or `None` when the id is
    /// not in the target view (no-op). The engine itself does not
    /// restrict deletion to `created-` records; that is a host policy.
    pub fn delete_counterpart(&mut self, target_item_id: &str) -> Option<CatalogDelta> {
        let category_id = self
            .target
            .find_record(target_item_id)
            .map(|(category, _)| category.id.clone())?;
        self.unmatch(target_item_id);
        if let Some(category) = self
            .target
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
        {
            category.items.retain(|item| item.id != target_item_id);
        }
        debug!(
            target = target_item_id,
            category = %category_id,
            "deleted counterpart"
        );
        Some(CatalogDelta::RecordRemoved {
            category_id,
            record_id: target_item_id.to_string(),
        })
    }

    /// Summary counts over the whole match set.
    pub fn summary(&self) -> MatchSummary {
        let matched = self.entries.values().filter(|e| e.is_matched).count();
        let created_targets = self
            .entries
            .values()
            .filter(|e| e.target_item.as_ref().is_some_and(Record::is_created))
            .count();
        MatchSummary {
            total_sources: self.entries.len(),
            matched,
            unmatched: self.entries.len() - matched,
            created_targets,
        }
    }

    /// Count matched entries per confidence level.
    pub fn count_by_level(
        &self,
        thresholds: &ConfidenceThresholds,
    ) -> BTreeMap<ConfidenceLevel, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values().filter(|e| e.is_matched) {
            *counts
                .entry(thresholds.categorize(entry.confidence))
                .or_insert(0) += 1;
        }
        counts
    }

    /// Snapshot the match set for persistence, entries in source order.
    pub fn to_config(&self, label: &str) -> MatchSetConfig {
        let mut pairs = Vec::new();
        for category in &self.source.categories {
            for item in &category.items {
                if let Some(entry) = self.entries.get(&item.id) {
                    pairs.push(entry.into());
                }
            }
        }
        MatchSetConfig {
            label: label.to_string(),
            entries: pairs,
        }
    }

    fn target_category_for(&self, source_category_id: &str) -> Option<&Category> {
        let target_id = self.correspondence.get(source_category_id)?.as_deref()?;
        self.target.category(target_id)
    }
}
