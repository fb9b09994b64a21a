//! Property tests for the feedback store and the pipeline built on it

use quickcheck_macros::quickcheck;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

use alttextbuddy::{
    analytics::summarize,
    feedback::{FeedbackInput, FeedbackStore},
    training::{export_training_data, is_training_candidate},
};

fn input_for(rating: i8, improved: bool) -> FeedbackInput {
    let input = FeedbackInput::rated(i32::from(rating)).with_alt_text("An image");
    if improved {
        input.with_improvement("A better description")
    } else {
        input
    }
}

#[quickcheck]
fn prop_appends_are_all_kept(entries: Vec<(i8, bool)>) -> bool {
    let entries: Vec<_> = entries.into_iter().take(25).collect();
    let temp = TempDir::new().unwrap();
    let store = FeedbackStore::new(temp.path().join("feedback.json"));

    let records = tokio_test::block_on(async {
        store.initialize().await.unwrap();
        for &(rating, improved) in &entries {
            store.append(input_for(rating, improved)).await.unwrap();
        }
        store.read_all().await.unwrap()
    });

    let ids: HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
    records.len() == entries.len()
        && ids.len() == entries.len()
        && records
            .iter()
            .zip(&entries)
            .all(|(record, &(rating, _))| record.rating == i32::from(rating))
}

#[quickcheck]
fn prop_export_matches_filter(entries: Vec<(i8, bool)>) -> bool {
    let records: Vec<_> = entries
        .iter()
        .enumerate()
        .map(|(i, &(rating, improved))| {
            input_for(rating, improved).into_record(i.to_string(), chrono::Utc::now())
        })
        .collect();

    let export = export_training_data(&records).unwrap();
    let expected = records.iter().filter(|r| is_training_candidate(r)).count();
    let summary = summarize(&records);

    export.count() == expected
        && export.payload.lines().count() == expected
        && summary.total_feedback == records.len()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_from_tasks() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FeedbackStore::new(temp.path().join("feedback.json")));
    store.initialize().await.unwrap();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.append(FeedbackInput::rated(i % 5 + 1)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let records = store.read_all().await.unwrap();
    let ids: HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(records.len(), 20);
    assert_eq!(ids.len(), 20);
}
