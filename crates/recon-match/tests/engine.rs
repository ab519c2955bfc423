use recon_match::{CatalogDelta, CommandStatus, MatchEngine, MatchError};
use recon_model::{Catalog, Category, Record};

fn record(id: &str, name: &str) -> Record {
    Record {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        price: None,
    }
}

fn category(id: &str, name: &str, items: Vec<Record>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        items,
    }
}

/// Source and target menus sharing an `appetizers` category by id and an
/// entrees category only by name.
fn sample_catalogs() -> (Catalog, Catalog) {
    let source = Catalog {
        categories: vec![
            category(
                "appetizers",
                "Appetizers",
                vec![
                    record("a1", "Chicken Wings"),
                    record("a2", "French Fries"),
                    record("a3", "Mozzarella Sticks"),
                ],
            ),
            category(
                "entrees-src",
                "Entrees",
                vec![record("e1", "Grilled Salmon")],
            ),
        ],
    };
    let target = Catalog {
        categories: vec![
            category(
                "appetizers",
                "Appetizers",
                vec![
                    record("t1", "Chicken Wings"),
                    record("t2", "Cheese Sticks"),
                    record("t3", "Onion Rings"),
                ],
            ),
            category(
                "entrees-tgt",
                "Entrees",
                vec![record("t4", "Grilled Salmon")],
            ),
        ],
    };
    (source, target)
}

fn assert_one_to_one(engine: &MatchEngine) {
    let mut seen = std::collections::BTreeSet::new();
    for category in &engine.source().categories {
        for item in &category.items {
            if let Some(target_id) = engine.get_match(&item.id).and_then(|e| e.target_id()) {
                assert!(
                    seen.insert(target_id.to_string()),
                    "target '{target_id}' held by two entries"
                );
            }
        }
    }
}

#[test]
fn initial_alignment_auto_matches_exact_names_only() {
    let (source, target) = sample_catalogs();
    let engine = MatchEngine::new(source, target);

    let wings = engine.get_match("a1").expect("entry for a1");
    assert!(wings.is_matched);
    assert_eq!(wings.target_id(), Some("t1"));
    assert_eq!(wings.confidence, 100.0);

    let fries = engine.get_match("a2").expect("entry for a2");
    assert!(!fries.is_matched);
    assert!(fries.target_item.is_none());
    assert!(fries.confidence < 100.0);

    // Mozzarella Sticks stays unmatched but retains its best candidate
    // score for display.
    let sticks = engine.get_match("a3").expect("entry for a3");
    assert!(!sticks.is_matched);
    assert!(sticks.confidence > 30.0);
}

#[test]
fn category_correspondence_falls_back_to_name() {
    let (source, target) = sample_catalogs();
    let engine = MatchEngine::new(source, target);

    let salmon = engine.get_match("e1").expect("entry for e1");
    assert!(salmon.is_matched);
    assert_eq!(salmon.target_id(), Some("t4"));
}

#[test]
fn no_cross_category_matching() {
    let source = Catalog {
        categories: vec![category(
            "drinks",
            "Drinks",
            vec![record("d1", "Chicken Wings")],
        )],
    };
    let (_, target) = sample_catalogs();
    let engine = MatchEngine::new(source, target);

    // "Chicken Wings" exists in the target, but only under appetizers;
    // the drinks category has no counterpart at all.
    let entry = engine.get_match("d1").expect("entry for d1");
    assert!(!entry.is_matched);
    assert_eq!(entry.confidence, 0.0);
    assert!(engine.suggest("d1").is_empty());
}

#[test]
fn auto_alignment_never_double_books_a_target() {
    let source = Catalog {
        categories: vec![category(
            "drinks",
            "Drinks",
            vec![record("d1", "Iced Tea"), record("d2", "Iced Tea")],
        )],
    };
    let target = Catalog {
        categories: vec![category("drinks", "Drinks", vec![record("t1", "Iced Tea")])],
    };
    let engine = MatchEngine::new(source, target);

    let first = engine.get_match("d1").expect("entry for d1");
    let second = engine.get_match("d2").expect("entry for d2");
    assert!(first.is_matched);
    assert!(!second.is_matched);
    // The loser still shows the perfect candidate score.
    assert_eq!(second.confidence, 100.0);
    assert_one_to_one(&engine);
}

#[test]
fn suggestions_are_capped_filtered_and_ordered() {
    let source = Catalog {
        categories: vec![category(
            "mains",
            "Mains",
            vec![record("m1", "Chicken Burger")],
        )],
    };
    let target = Catalog {
        categories: vec![category(
            "mains",
            "Mains",
            vec![
                record("t1", "Chicken Burger Deluxe"),
                record("t2", "Chicken Wrap"),
                record("t3", "Beef Burger"),
                record("t4", "Chicken Burger Supreme"),
                record("t5", "Tiramisu"),
            ],
        )],
    };
    let engine = MatchEngine::new(source, target);

    let suggestions = engine.suggest("m1");
    assert!(suggestions.len() <= 3);
    assert_eq!(suggestions.len(), 3, "four candidates clear the threshold");
    assert_eq!(suggestions[0].item.name, "Chicken Burger Deluxe");
    for pair in suggestions.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
    for suggestion in &suggestions {
        assert!(suggestion.confidence > 30.0);
        assert!(suggestion.confidence < 100.0);
    }
}

#[test]
fn suggestions_exclude_claimed_targets() {
    let (source, target) = sample_catalogs();
    let engine = MatchEngine::new(source, target);

    // t1 is auto-matched to a1, so it must never be suggested even
    // though it would score well against other wings-like names.
    for suggestion in engine.suggest("a3") {
        assert_ne!(suggestion.item.id, "t1");
    }
}

#[test]
fn manual_match_applies_and_recomputes_confidence() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    let status = engine.manual_match("a3", "t2").expect("no conflict");
    assert_eq!(status, CommandStatus::Applied);

    let entry = engine.get_match("a3").expect("entry for a3");
    assert!(entry.is_matched);
    assert_eq!(entry.target_id(), Some("t2"));
    assert!(entry.confidence > 30.0 && entry.confidence < 100.0);
    assert_one_to_one(&engine);
}

#[test]
fn manual_match_rejects_claimed_target() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    // t1 is already held by a1 from the initial alignment.
    let err = engine.manual_match("a2", "t1").expect_err("conflict");
    assert_eq!(
        err,
        MatchError::TargetAlreadyClaimed {
            target_id: "t1".to_string(),
            claimed_by: "a1".to_string(),
        }
    );
    // The losing entry is untouched.
    assert!(!engine.get_match("a2").expect("entry").is_matched);
    assert_one_to_one(&engine);
}

#[test]
fn manual_match_reconfirming_own_target_is_applied() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    let status = engine.manual_match("a1", "t1").expect("no conflict");
    assert_eq!(status, CommandStatus::Applied);
    assert_eq!(engine.get_match("a1").expect("entry").target_id(), Some("t1"));
}

#[test]
fn manual_match_releases_previous_claim() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    engine.manual_match("a3", "t2").expect("first match");
    engine.manual_match("a3", "t3").expect("re-match");

    let entry = engine.get_match("a3").expect("entry");
    assert_eq!(entry.target_id(), Some("t3"));
    // t2 is free again and may be claimed by someone else.
    let status = engine.manual_match("a2", "t2").expect("t2 released");
    assert_eq!(status, CommandStatus::Applied);
    assert_one_to_one(&engine);
}

#[test]
fn manual_match_unresolvable_ids_are_noops() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    assert_eq!(
        engine.manual_match("ghost", "t2").expect("no conflict"),
        CommandStatus::NoOp
    );
    assert_eq!(
        engine.manual_match("a2", "ghost").expect("no conflict"),
        CommandStatus::NoOp
    );
    // Target ids resolve only within the corresponding category.
    assert_eq!(
        engine.manual_match("a2", "t4").expect("no conflict"),
        CommandStatus::NoOp
    );
}

#[test]
fn unmatch_is_idempotent() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    assert_eq!(engine.unmatch("t1"), CommandStatus::Applied);
    let entry = engine.get_match("a1").expect("entry");
    assert!(!entry.is_matched);
    assert!(entry.target_item.is_none());

    assert_eq!(engine.unmatch("t1"), CommandStatus::NoOp);
    assert!(!engine.get_match("a1").expect("entry").is_matched);
}

#[test]
fn unmatched_targets_return_to_the_pool() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    let before: Vec<_> = engine
        .list_unmatched_targets("appetizers")
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(before, vec!["t2", "t3"]);

    engine.unmatch("t1");
    let after: Vec<_> = engine
        .list_unmatched_targets("appetizers")
        .iter()
        .map(|r| r.id.clone())
        .collect();
    assert_eq!(after, vec!["t1", "t2", "t3"]);
}

#[test]
fn create_counterpart_emits_delta_and_matches_at_100() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    assert!(!engine.exists_in_target("a2"));
    let delta = engine
        .create_counterpart("a2")
        .expect("no duplicate")
        .expect("applied");

    let CatalogDelta::RecordAdded {
        category_id,
        record,
    } = &delta
    else {
        panic!("expected RecordAdded, got {delta:?}");
    };
    assert_eq!(category_id, "appetizers");
    assert_eq!(record.name, "French Fries");
    assert!(record.is_created());

    let entry = engine.get_match("a2").expect("entry");
    assert!(entry.is_matched);
    assert_eq!(entry.confidence, 100.0);
    assert_eq!(entry.target_id(), Some(record.id.as_str()));

    // The engine's target view now carries the counterpart.
    assert!(engine.exists_in_target("a2"));
    assert!(engine.target_view().find_record(&record.id).is_some());
    assert_one_to_one(&engine);
}

#[test]
fn create_counterpart_refuses_duplicate_names() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    // "Chicken Wings" already exists in the target category.
    let err = engine.create_counterpart("a1").expect_err("duplicate");
    assert_eq!(
        err,
        MatchError::DuplicateName {
            name: "Chicken Wings".to_string(),
            category_id: "appetizers".to_string(),
        }
    );
}

#[test]
fn create_counterpart_without_entry_or_category_is_noop() {
    let source = Catalog {
        categories: vec![category("sides", "Sides", vec![record("s1", "Coleslaw")])],
    };
    let target = Catalog { categories: vec![] };
    let mut engine = MatchEngine::new(source, target);

    assert!(engine.create_counterpart("ghost").expect("noop").is_none());
    // No corresponding target category to append into.
    assert!(engine.create_counterpart("s1").expect("noop").is_none());
}

#[test]
fn delete_counterpart_unmatches_and_removes_the_record() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    let delta = engine
        .create_counterpart("a2")
        .expect("no duplicate")
        .expect("applied");
    let CatalogDelta::RecordAdded { record, .. } = delta else {
        panic!("expected RecordAdded");
    };

    let removed = engine.delete_counterpart(&record.id).expect("applied");
    assert_eq!(
        removed,
        CatalogDelta::RecordRemoved {
            category_id: "appetizers".to_string(),
            record_id: record.id.clone(),
        }
    );
    assert!(!engine.get_match("a2").expect("entry").is_matched);
    assert!(engine.target_view().find_record(&record.id).is_none());

    // Second delete of the same id is a no-op.
    assert!(engine.delete_counterpart(&record.id).is_none());
}

#[test]
fn delete_counterpart_works_on_host_records_too() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    let removed = engine.delete_counterpart("t1").expect("applied");
    assert_eq!(
        removed,
        CatalogDelta::RecordRemoved {
            category_id: "appetizers".to_string(),
            record_id: "t1".to_string(),
        }
    );
    assert!(!engine.get_match("a1").expect("entry").is_matched);
}

#[test]
fn one_to_one_holds_across_command_sequences() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    engine.manual_match("a3", "t2").expect("match a3");
    engine.unmatch("t1");
    engine.manual_match("a1", "t1").expect("rematch a1");
    let _ = engine.create_counterpart("a2").expect("create");
    engine.unmatch("t2");
    engine.manual_match("a3", "t2").expect("rematch a3");
    assert_one_to_one(&engine);

    let summary = engine.summary();
    assert_eq!(summary.total_sources, 4);
    assert_eq!(summary.matched + summary.unmatched, summary.total_sources);
    assert_eq!(summary.created_targets, 1);
}

#[test]
fn listing_splits_by_state_in_source_order() {
    let (source, target) = sample_catalogs();
    let engine = MatchEngine::new(source, target);

    let listing = engine.list_matches("appetizers");
    let matched: Vec<_> = listing.matched.iter().map(|e| e.source_item.id.as_str()).collect();
    let unmatched: Vec<_> = listing
        .unmatched
        .iter()
        .map(|e| e.source_item.id.as_str())
        .collect();
    assert_eq!(matched, vec!["a1"]);
    assert_eq!(unmatched, vec!["a2", "a3"]);
}

#[test]
fn realign_discards_operator_decisions() {
    let (source, target) = sample_catalogs();
    let mut engine = MatchEngine::new(source, target);

    engine.manual_match("a3", "t2").expect("match a3");
    assert!(engine.get_match("a3").expect("entry").is_matched);

    engine.realign();
    // The manual pairing scored below 100, so realignment drops it.
    assert!(!engine.get_match("a3").expect("entry").is_matched);
    // Exact pairs come back automatically.
    assert!(engine.get_match("a1").expect("entry").is_matched);
}

#[test]
fn snapshot_preserves_source_order_and_counts() {
    let (source, target) = sample_catalogs();
    let engine = MatchEngine::new(source, target);

    let config = engine.to_config("menus-2026");
    assert_eq!(config.label, "menus-2026");
    let ids: Vec<_> = config.entries.iter().map(|e| e.source_id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3", "e1"]);
    assert_eq!(config.matched_count(), 2);
    assert_eq!(config.unmatched_count(), 2);
}
