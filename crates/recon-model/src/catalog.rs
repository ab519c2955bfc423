use serde::{Deserialize, Serialize};

/// Prefix tagging records synthesized by the reconciliation engine.
///
/// Records minted by `create_counterpart` carry ids of the form
/// `created-<n>`; host-supplied records must not use this prefix.
pub const CREATED_ID_PREFIX: &str = "created-";

/// A named leaf entity within a category (e.g., a menu line item).
///
/// Identity is the `id`; only `name` participates in similarity scoring.
/// Records are immutable once created except for category containment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque identifier, unique within its catalog.
    pub id: String,
    /// Display name; the sole input to equivalence scoring.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Record {
    /// Returns true if this record was synthesized by the engine
    /// rather than supplied by the host catalog.
    pub fn is_created(&self) -> bool {
        self.id.starts_with(CREATED_ID_PREFIX)
    }
}

/// A named grouping of records, present independently in the source
/// and target catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Records in display order; order is significant for tie-breaking.
    #[serde(default)]
    pub items: Vec<Record>,
}

impl Category {
    /// Look up a record by id.
    pub fn item(&self, record_id: &str) -> Option<&Record> {
        self.items.iter().find(|item| item.id == record_id)
    }

    /// Look up a record by name, case-insensitive and whitespace-trimmed.
    pub fn item_by_name(&self, name: &str) -> Option<&Record> {
        let wanted = name.trim();
        self.items
            .iter()
            .find(|item| item.name.trim().eq_ignore_ascii_case(wanted))
    }
}

/// An ordered sequence of categories. The source and target catalogs
/// exist independently and are supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Look up a category by id.
    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Look up a category by name, case-insensitive and trimmed.
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let wanted = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.trim().eq_ignore_ascii_case(wanted))
    }

    /// Find a record anywhere in the catalog, returning it with its
    /// containing category.
    pub fn find_record(&self, record_id: &str) -> Option<(&Category, &Record)> {
        for category in &self.categories {
            if let Some(record) = category.item(record_id) {
                return Some((category, record));
            }
        }
        None
    }

    /// Total record count across all categories.
    pub fn record_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Verify structural well-formedness: category ids and record ids
    /// must be unique across the catalog.
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut category_ids = std::collections::HashSet::new();
        let mut record_ids = std::collections::HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(crate::error::ModelError::DuplicateCategory {
                    id: category.id.clone(),
                });
            }
            for item in &category.items {
                if !record_ids.insert(item.id.as_str()) {
                    return Err(crate::error::ModelError::DuplicateRecord {
                        id: item.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
