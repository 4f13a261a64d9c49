//! Journey: similarity edges and concept links materialized on ingest.

use std::sync::Arc;

use engram_core::{
    InMemoryGraphStore, InMemoryVectorStore, MemoryMetadata, RelationshipBuilder,
    EDGE_SIMILAR, SIMILARITY_EDGE_THRESHOLD,
};

use engram_e2e_tests::fixtures::{engine_with_extractor, OWNER};
use engram_e2e_tests::mocks::{OfflineExtractor, ScriptedVectorStore, StubExtractor};

#[tokio::test]
async fn similarity_exactly_at_threshold_creates_no_edge() {
    let scripted = Arc::new(ScriptedVectorStore::new(vec![ScriptedVectorStore::hit(
        "existing",
        "boundary neighbor",
        0.70,
    )]));
    let graph = Arc::new(InMemoryGraphStore::new());
    let engine = engine_with_extractor(scripted, graph.clone(), Arc::new(OfflineExtractor));

    engine
        .store_memory_with_context(OWNER, "fresh memory", "fact", 5, MemoryMetadata::default())
        .await
        .unwrap();

    assert_eq!(
        graph.edge_strength("scripted-memory", "existing", EDGE_SIMILAR),
        None,
        "0.70 is not strictly above the threshold"
    );
    assert_eq!(graph.edge_count(), 0);
}

#[tokio::test]
async fn similarity_above_threshold_creates_edge_with_that_strength() {
    let scripted = Arc::new(ScriptedVectorStore::new(vec![
        ScriptedVectorStore::hit("close", "close neighbor", 0.92),
        ScriptedVectorStore::hit("borderline", "borderline neighbor", 0.71),
        ScriptedVectorStore::hit("distant", "distant neighbor", 0.40),
    ]));
    let graph = Arc::new(InMemoryGraphStore::new());
    let engine = engine_with_extractor(scripted, graph.clone(), Arc::new(OfflineExtractor));

    engine
        .store_memory_with_context(OWNER, "fresh memory", "fact", 5, MemoryMetadata::default())
        .await
        .unwrap();

    assert_eq!(
        graph.edge_strength("scripted-memory", "close", EDGE_SIMILAR),
        Some(0.92)
    );
    assert_eq!(
        graph.edge_strength("scripted-memory", "borderline", EDGE_SIMILAR),
        Some(0.71)
    );
    assert_eq!(
        graph.edge_strength("scripted-memory", "distant", EDGE_SIMILAR),
        None
    );
}

#[tokio::test]
async fn builder_skips_the_memory_itself() {
    // The store echoes the fresh memory back as its own best match
    let scripted = Arc::new(ScriptedVectorStore::new(vec![ScriptedVectorStore::hit(
        "scripted-memory",
        "fresh memory",
        1.0,
    )]));
    let graph = Arc::new(InMemoryGraphStore::new());
    let builder = RelationshipBuilder::new(SIMILARITY_EDGE_THRESHOLD);

    let created = builder
        .link_similar(
            scripted.as_ref(),
            graph.as_ref(),
            OWNER,
            "scripted-memory",
            "fresh memory",
        )
        .await;

    assert_eq!(created, 0);
    assert_eq!(graph.edge_count(), 0);
}

#[tokio::test]
async fn concept_links_count_and_increment_frequency() {
    let vectors = Arc::new(InMemoryVectorStore::default());
    let graph = Arc::new(InMemoryGraphStore::new());
    let extractor = Arc::new(StubExtractor(vec!["Food".into(), "Travel".into()]));
    let engine = engine_with_extractor(vectors, graph.clone(), extractor);

    let first = engine
        .store_memory_with_context(
            OWNER,
            "trying the trattoria by the station",
            "fact",
            5,
            MemoryMetadata::default(),
        )
        .await
        .unwrap();
    assert_eq!(first.concepts_extracted, 2);
    assert_eq!(graph.concept_frequency("food"), Some(1));

    engine
        .store_memory_with_context(
            OWNER,
            "found a new ramen place downtown",
            "fact",
            5,
            MemoryMetadata::default(),
        )
        .await
        .unwrap();
    assert_eq!(graph.concept_frequency("food"), Some(2));
    assert_eq!(graph.concept_frequency("travel"), Some(2));
}

#[tokio::test]
async fn relinking_updates_edge_strength_in_place() {
    let graph = Arc::new(InMemoryGraphStore::new());
    let builder = RelationshipBuilder::new(SIMILARITY_EDGE_THRESHOLD);

    let first = Arc::new(ScriptedVectorStore::new(vec![ScriptedVectorStore::hit(
        "existing",
        "neighbor",
        0.80,
    )]));
    builder
        .link_similar(first.as_ref(), graph.as_ref(), OWNER, "fresh", "content")
        .await;

    let second = Arc::new(ScriptedVectorStore::new(vec![ScriptedVectorStore::hit(
        "existing",
        "neighbor",
        0.95,
    )]));
    builder
        .link_similar(second.as_ref(), graph.as_ref(), OWNER, "fresh", "content")
        .await;

    assert_eq!(graph.edge_strength("fresh", "existing", EDGE_SIMILAR), Some(0.95));
    assert_eq!(graph.edge_count(), 1);
}
