//! End-to-end split verification through the public API.
//!
//! Uses the stub `BertEmbedder` (no model files) and the `mock` feature provider.

use std::sync::Arc;

use tasksplit::{
    BertEmbedder, BertEmbedderConfig, Config, EmbeddingProvider, MockEmbeddingProvider, NGramMode,
    SplitVerifier, TaskType, ThresholdPolicy, VerifyError, dynamic_threshold, ngram_similarity,
};

const PARENT: &str = "disconnect battery terminals then remove mounting bolts";
const FIRST: &str = "disconnect battery terminals";
const SECOND: &str = "then remove mounting bolts";

fn stub_verifier() -> SplitVerifier<BertEmbedder> {
    SplitVerifier::new(BertEmbedder::stub().expect("stub embedder loads"))
}

#[test]
fn test_restated_split_is_valid() {
    let verifier = stub_verifier();
    let result = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();

    assert!(result.union_similarity > 0.99, "{result}");
    assert!(result.is_union_valid);
    assert!(result.is_intersection_valid);
    assert!(result.overall_valid);
}

#[test]
fn test_copied_subtasks_fail_intersection() {
    let verifier = stub_verifier();
    let result = verifier
        .verify(
            "remove mounting bolts",
            "remove mounting bolts",
            "remove mounting bolts",
            false,
        )
        .unwrap();

    assert!(result.intersection_similarity > 0.99);
    assert!(!result.is_intersection_valid);
    assert!(!result.overall_valid);
}

#[test]
fn test_unrelated_subtasks_fail_union() {
    let verifier = stub_verifier();
    let result = verifier
        .verify(PARENT, "bake sourdough bread", "water the garden", false)
        .unwrap();

    assert!(!result.is_union_valid, "{result}");
    assert!(!result.overall_valid);
}

#[test]
fn test_verification_is_deterministic_across_instances() {
    let first = stub_verifier().verify(PARENT, FIRST, SECOND, false).unwrap();
    let second = stub_verifier().verify(PARENT, FIRST, SECOND, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_thresholds_follow_parent_length() {
    let embedder = BertEmbedder::stub().unwrap();
    let verifier = SplitVerifier::new(&embedder);
    let result = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();

    // 7 words + [CLS] + [SEP]
    assert_eq!(embedder.token_count(PARENT).unwrap(), 9);
    let expected_union = 0.85 * 0.95f32.powf(0.9);
    let expected_intersection = 0.35 * 0.95f32.powf(0.9);
    assert!((result.union_threshold - expected_union).abs() < 1e-6);
    assert!((result.intersection_threshold - expected_intersection).abs() < 1e-6);

    assert_eq!(
        dynamic_threshold(&embedder, PARENT, TaskType::Union).unwrap(),
        result.union_threshold
    );
}

#[test]
fn test_long_parent_hits_length_cap() {
    let embedder = BertEmbedder::stub().unwrap();
    let long_text = "unbolt the cover ".repeat(100);

    assert_eq!(embedder.token_count(&long_text).unwrap(), 128);
    let union = dynamic_threshold(&embedder, &long_text, TaskType::Union).unwrap();
    assert!((union - 0.85 * 0.95f32.powf(12.8)).abs() < 1e-6);
    assert!(union >= 0.1);
}

#[test]
fn test_shorter_seq_len_raises_threshold() {
    let embedder = BertEmbedder::load(BertEmbedderConfig::stub().with_max_seq_len(16)).unwrap();
    let policy = ThresholdPolicy {
        max_tokens: 16,
        ..Default::default()
    };
    let long_text = "unbolt the cover ".repeat(100);

    let capped = policy
        .threshold(&embedder, &long_text, TaskType::Intersection)
        .unwrap();
    assert!((capped - policy.threshold_for_length(TaskType::Intersection, 16)).abs() < 1e-6);
}

#[test]
fn test_refrigerator_scenario_with_mock_embeddings() {
    let parent = "put the elephant into the refrigerator";
    let first = "open the refrigerator door";
    let second = "push the elephant inside and close the door";

    let provider = MockEmbeddingProvider::new(4)
        .with_embedding(parent, vec![0.7, 0.7, 0.1, 0.0])
        .with_embedding(format!("{first} {second}"), vec![0.68, 0.72, 0.12, 0.02])
        .with_embedding(first, vec![0.9, 0.1, 0.0, 0.4])
        .with_embedding(second, vec![0.1, 0.9, 0.0, -0.4]);
    let verifier = SplitVerifier::new(Arc::new(provider));

    let result = verifier.verify(parent, first, second, false).unwrap();
    assert!(result.is_union_valid, "{result}");
    assert!(result.is_intersection_valid, "{result}");
    assert!(result.overall_valid);
    assert_eq!(result.debug_status(), "VALID");
}

#[test]
fn test_unavailable_provider_surfaces_error() {
    let verifier = SplitVerifier::new(MockEmbeddingProvider::failing("model server down"));
    let err = verifier.verify(PARENT, FIRST, SECOND, false).unwrap_err();
    assert!(matches!(err, VerifyError::Embedding(_)));
    assert!(err.is_external());
}

#[test]
fn test_default_config_builds_stub_pipeline() {
    let config = Config::default();
    let embedder = BertEmbedder::load(config.embedder_config()).unwrap();
    assert!(embedder.is_stub());

    let verifier = SplitVerifier::with_policy(embedder, config.threshold_policy).unwrap();
    assert!(
        verifier
            .verify(PARENT, FIRST, SECOND, false)
            .unwrap()
            .overall_valid
    );
}

#[test]
fn test_word_ngram_overlap_of_split_parts() {
    let lexical = ngram_similarity(FIRST, FIRST, 2, NGramMode::Word).unwrap();
    assert_eq!(lexical, 1.0);

    let overlap = ngram_similarity(FIRST, SECOND, 1, NGramMode::Word).unwrap();
    assert_eq!(overlap, 0.0);
}
