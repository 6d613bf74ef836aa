// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: seed knowledge, ask, and inspect what was written.

use lore_agent::EntryLabels;
use lore_core::traits::{MemoryStore, UnansweredLog};
use lore_core::types::EntryKind;
use lore_test_utils::{MockEmbedder, TEST_BOT, TEST_USER, TestHarness, unit_at_similarity};

const HOURS_QUERY: &str = "what time do you open";

fn hours() -> EntryKind {
    EntryKind::Qa {
        question: "What are your hours?".into(),
        answer: "9 to 5".into(),
    }
}

fn extraction(key: &str, value: &str, confidence: f64) -> String {
    format!(
        r#"{{"memories":[{{"key":"{key}","value":"{value}","memory_type":"personal","importance":9,"confidence":{confidence}}}],"memory_context":""}}"#
    )
}

#[tokio::test]
async fn confident_match_is_answered_from_knowledge() {
    let harness = TestHarness::builder()
        .with_embedder(MockEmbedder::new().with_vector(HOURS_QUERY, unit_at_similarity(0.7)))
        .with_config(|c| c.memory.enabled = false)
        .with_mock_responses(vec!["We're open 9 to 5.".into()])
        .build()
        .await
        .unwrap();
    harness.seed_entry("hours", hours(), vec![1.0, 0.0]).await.unwrap();

    let answer = harness.ask(HOURS_QUERY).await.unwrap();

    assert!(answer.was_answered);
    assert!((answer.confidence - 0.7).abs() < 1e-4);
    assert_eq!(answer.used_entry_ids, vec!["hours".to_string()]);
    assert_eq!(answer.reply, "We're open 9 to 5.");

    let requests = harness.generator.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].system_prompt.contains("A: 9 to 5"));
    assert_eq!(requests[0].user_message, HOURS_QUERY);
    assert!(harness.store.unanswered_for_bot(TEST_BOT).await.unwrap().is_empty());
}

#[tokio::test]
async fn lowered_threshold_admits_weaker_match() {
    let harness = TestHarness::builder()
        .with_embedder(MockEmbedder::new().with_vector(HOURS_QUERY, unit_at_similarity(0.55)))
        .with_config(|c| {
            c.memory.enabled = false;
            c.confidence.embedding_min = 0.5;
        })
        .build()
        .await
        .unwrap();
    harness.seed_entry("hours", hours(), vec![1.0, 0.0]).await.unwrap();

    let answer = harness.ask(HOURS_QUERY).await.unwrap();
    assert!(answer.was_answered);
    assert_eq!(answer.used_entry_ids, vec!["hours".to_string()]);
}

#[tokio::test]
async fn unrelated_question_is_declined_and_logged() {
    let query = "do you sell furniture";
    let harness = TestHarness::builder()
        .with_embedder(MockEmbedder::new().with_vector(query, unit_at_similarity(0.2)))
        .with_config(|c| c.memory.enabled = false)
        .with_mock_responses(vec!["Sorry, I don't know that yet.".into()])
        .build()
        .await
        .unwrap();
    harness.seed_entry("hours", hours(), vec![1.0, 0.0]).await.unwrap();

    let answer = harness.ask(query).await.unwrap();

    assert!(!answer.was_answered);
    assert!(answer.used_entry_ids.is_empty());
    assert_eq!(answer.reply, "Sorry, I don't know that yet.");

    let requests = harness.generator.requests().await;
    assert!(!requests[0].system_prompt.contains("9 to 5"));

    let logged = harness.store.unanswered_for_bot(TEST_BOT).await.unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].question, query);
    assert_eq!(logged[0].user_id, TEST_USER);
}

#[tokio::test]
async fn fallback_tier_grounds_prompt_but_stays_unanswered() {
    let harness = TestHarness::builder()
        .with_embedder(MockEmbedder::new().with_vector(HOURS_QUERY, unit_at_similarity(0.45)))
        .with_config(|c| c.memory.enabled = false)
        .build()
        .await
        .unwrap();
    harness.seed_entry("hours", hours(), vec![1.0, 0.0]).await.unwrap();

    let answer = harness.ask(HOURS_QUERY).await.unwrap();

    assert!(!answer.was_answered);
    assert_eq!(answer.used_entry_ids, vec!["hours".to_string()]);
    let requests = harness.generator.requests().await;
    assert!(requests[0].system_prompt.contains("A: 9 to 5"));
    assert_eq!(harness.store.unanswered_for_bot(TEST_BOT).await.unwrap().len(), 1);
}

#[tokio::test]
async fn menu_question_surfaces_boosted_image() {
    let query = "show me the menu";
    let harness = TestHarness::builder()
        .with_embedder(MockEmbedder::new().with_vector(query, vec![1.0, 0.0]))
        .with_config(|c| c.memory.enabled = false)
        .build()
        .await
        .unwrap();
    harness
        .seed_entry("hours", hours(), unit_at_similarity(0.52))
        .await
        .unwrap();
    harness
        .seed_entry(
            "menu",
            EntryKind::Image {
                description: "Today's lunch menu".into(),
                alt_text: "Menu board".into(),
                url: "https://cdn.example.test/menu.png".into(),
            },
            unit_at_similarity(0.45),
        )
        .await
        .unwrap();

    let answer = harness.ask(query).await.unwrap();

    assert_eq!(answer.used_entry_ids, vec!["menu".to_string(), "hours".to_string()]);
    assert_eq!(answer.images.len(), 1);
    assert_eq!(answer.images[0].url, "https://cdn.example.test/menu.png");
    assert!((answer.confidence - 0.55).abs() < 1e-4);
}

#[tokio::test]
async fn keyword_only_entries_are_still_found() {
    let query = "library timings";
    let harness = TestHarness::builder()
        .with_embedder(MockEmbedder::failing())
        .with_config(|c| c.memory.enabled = false)
        .with_mock_responses(vec!["Block C, second floor.".into()])
        .build()
        .await
        .unwrap();

    let entry = harness
        .trainer
        .teach_qa(
            TEST_BOT,
            "Where is the library?",
            "Block C, second floor",
            EntryLabels {
                keywords: vec!["Library".into()],
                ..EntryLabels::default()
            },
        )
        .await
        .unwrap();
    assert!(!entry.has_embedding());

    let answer = harness.ask(query).await.unwrap();

    // "library" hits keyword and text, "timings" nothing: 3 / (2 * 2).
    assert!((answer.confidence - 0.75).abs() < 1e-9);
    assert!(answer.was_answered);
    assert_eq!(answer.used_entry_ids, vec![entry.id]);
}

#[tokio::test]
async fn memories_only_move_to_more_confident_values() {
    let harness = TestHarness::builder()
        .with_mock_responses(vec![
            "Nice to meet you!".into(),
            extraction("name", "John", 0.9),
            "Okay!".into(),
            extraction("name", "Jon", 0.5),
            "Got it, Johnny.".into(),
            extraction("name", "Johnny", 0.95),
        ])
        .build()
        .await
        .unwrap();

    let name = |memories: Vec<lore_core::types::UserMemory>| {
        let found: Vec<_> = memories.into_iter().filter(|m| m.key == "name").collect();
        assert_eq!(found.len(), 1, "one record per key");
        (found[0].value.clone(), found[0].confidence)
    };

    harness.ask("I'm John").await.unwrap();
    let first = name(harness.store.memories_for(TEST_USER, TEST_BOT).await.unwrap());
    assert_eq!(first, ("John".to_string(), 0.9));

    harness.ask("people also call me Jon").await.unwrap();
    let second = name(harness.store.memories_for(TEST_USER, TEST_BOT).await.unwrap());
    assert_eq!(second, ("John".to_string(), 0.9));

    harness.ask("actually it's Johnny").await.unwrap();
    let third = name(harness.store.memories_for(TEST_USER, TEST_BOT).await.unwrap());
    assert_eq!(third, ("Johnny".to_string(), 0.95));

    assert_eq!(harness.generator.requests().await.len(), 6);
}
