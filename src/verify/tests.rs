use super::*;
use crate::embedding::{
    BertEmbedder, Embedding, EmbeddingError, EmbeddingProvider, MockEmbeddingProvider,
};
use crate::threshold::{TaskType, ThresholdError, ThresholdPolicy};

const PARENT: &str = "strip the casing";
const FIRST: &str = "unscrew panel";
const SECOND: &str = "lift shell";

fn split_provider() -> MockEmbeddingProvider {
    MockEmbeddingProvider::new(3)
        .with_embedding(PARENT, vec![1.0, 0.0, 0.0])
        .with_embedding(format!("{FIRST} {SECOND}"), vec![0.9, 0.1, 0.1])
        .with_embedding(FIRST, vec![0.0, 1.0, 0.0])
        .with_embedding(SECOND, vec![0.0, 0.0, 1.0])
}

mod result_tests {
    use super::*;

    #[test]
    fn test_from_scores_valid() {
        let result = VerificationResult::from_scores(0.9, 0.8, 0.1, 0.3);
        assert!(result.is_union_valid);
        assert!(result.is_intersection_valid);
        assert!(result.overall_valid);
        assert_eq!(result.debug_status(), "VALID");
    }

    #[test]
    fn test_from_scores_boundaries_are_inclusive() {
        let result = VerificationResult::from_scores(0.8, 0.8, 0.3, 0.3);
        assert!(result.is_union_valid);
        assert!(result.is_intersection_valid);
        assert!(result.overall_valid);
    }

    #[test]
    fn test_from_scores_each_side_rejects() {
        let union_rejected = VerificationResult::from_scores(0.5, 0.8, 0.1, 0.3);
        assert!(!union_rejected.overall_valid);
        assert_eq!(union_rejected.debug_status(), "UNION_REJECTED");

        let intersection_rejected = VerificationResult::from_scores(0.9, 0.8, 0.31, 0.3);
        assert!(!intersection_rejected.overall_valid);
        assert_eq!(
            intersection_rejected.debug_status(),
            "INTERSECTION_REJECTED"
        );

        let both = VerificationResult::from_scores(0.1, 0.8, 0.9, 0.3);
        assert_eq!(both.debug_status(), "BOTH_REJECTED");
    }

    #[test]
    fn test_display() {
        let result = VerificationResult::from_scores(0.91234, 0.8, 0.1, 0.3);
        let text = result.to_string();
        assert!(text.starts_with("VALID"));
        assert!(text.contains("0.9123"));
    }

    #[test]
    fn test_serializes_all_fields() {
        let result = VerificationResult::from_scores(0.9, 0.8, 0.1, 0.3);
        let json = serde_json::to_value(result).unwrap();
        for key in [
            "union_similarity",
            "union_threshold",
            "intersection_similarity",
            "intersection_threshold",
            "is_union_valid",
            "is_intersection_valid",
            "overall_valid",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}

mod verifier_tests {
    use super::*;

    #[test]
    fn test_valid_split() {
        let verifier = SplitVerifier::new(split_provider());
        let result = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();

        assert!(result.union_similarity > 0.95);
        assert_eq!(result.intersection_similarity, 0.0);
        // "strip the casing" -> 3 words + 2 special tokens
        let policy = ThresholdPolicy::default();
        assert_eq!(
            result.union_threshold,
            policy.threshold_for_length(TaskType::Union, 5)
        );
        assert_eq!(
            result.intersection_threshold,
            policy.threshold_for_length(TaskType::Intersection, 5)
        );
        assert!(result.overall_valid);
    }

    #[test]
    fn test_duplicate_subtasks_fail_intersection() {
        let provider = MockEmbeddingProvider::new(3)
            .with_embedding(PARENT, vec![1.0, 0.0, 0.0])
            .with_embedding("lift shell lift shell", vec![1.0, 0.0, 0.0])
            .with_embedding("lift shell", vec![0.0, 1.0, 0.0]);
        let verifier = SplitVerifier::new(provider);

        let result = verifier
            .verify(PARENT, "lift shell", "lift shell", false)
            .unwrap();
        assert!(result.is_union_valid);
        assert!(!result.is_intersection_valid);
        assert!(!result.overall_valid);
    }

    #[test]
    fn test_duplicate_texts_are_embedded_once() {
        let provider = MockEmbeddingProvider::new(3)
            .with_embedding(PARENT, vec![1.0, 0.0, 0.0])
            .with_embedding("lift shell lift shell", vec![1.0, 0.0, 0.0])
            .with_embedding("lift shell", vec![0.0, 1.0, 0.0]);
        let verifier = SplitVerifier::new(provider);

        verifier
            .verify(PARENT, "lift shell", "lift shell", false)
            .unwrap();
        assert_eq!(verifier.provider().embed_calls(), 3);

        verifier.verify(PARENT, "lift shell", "lift shell", false).unwrap();
        assert_eq!(verifier.provider().embed_calls(), 6);
    }

    #[test]
    fn test_union_drift_fails_union() {
        let provider = MockEmbeddingProvider::new(3)
            .with_embedding(PARENT, vec![1.0, 0.0, 0.0])
            .with_embedding(format!("{FIRST} {SECOND}"), vec![0.0, 1.0, 1.0])
            .with_embedding(FIRST, vec![0.0, 1.0, 0.0])
            .with_embedding(SECOND, vec![0.0, 0.0, 1.0]);
        let verifier = SplitVerifier::new(provider);

        let result = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();
        assert!(!result.is_union_valid);
        assert!(result.is_intersection_valid);
        assert!(!result.overall_valid);
    }

    #[test]
    fn test_zero_vector_embeddings_are_degenerate_not_errors() {
        let provider = MockEmbeddingProvider::new(3)
            .with_embedding(PARENT, vec![0.0, 0.0, 0.0])
            .with_embedding(format!("{FIRST} {SECOND}"), vec![1.0, 0.0, 0.0])
            .with_embedding(FIRST, vec![0.0, 0.0, 0.0])
            .with_embedding(SECOND, vec![0.0, 1.0, 0.0]);
        let verifier = SplitVerifier::new(provider);

        let result = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();
        assert_eq!(result.union_similarity, 0.0);
        assert_eq!(result.intersection_similarity, 0.0);
        assert!(!result.is_union_valid);
        assert!(result.is_intersection_valid);
    }

    #[test]
    fn test_verify_is_idempotent() {
        let verifier = SplitVerifier::new(split_provider());
        let first = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();
        let second = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.union_similarity.to_bits(),
            second.union_similarity.to_bits()
        );
        assert_eq!(
            first.intersection_threshold.to_bits(),
            second.intersection_threshold.to_bits()
        );
    }

    #[test]
    fn test_verbose_does_not_change_result() {
        let verifier = SplitVerifier::new(split_provider());
        let quiet = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();
        let loud = verifier.verify(PARENT, FIRST, SECOND, true).unwrap();
        assert_eq!(quiet, loud);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ThresholdPolicy {
            union_base: 1.0,
            decay_factor: 1.0,
            ..Default::default()
        };
        let verifier = SplitVerifier::with_policy(split_provider(), policy).unwrap();
        let result = verifier.verify(PARENT, FIRST, SECOND, false).unwrap();
        assert_eq!(result.union_threshold, 1.0);
        assert!(!result.is_union_valid);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let policy = ThresholdPolicy {
            floor: 0.0,
            ..Default::default()
        };
        let result = SplitVerifier::with_policy(split_provider(), policy);
        assert!(matches!(
            result,
            Err(VerifyError::Threshold(ThresholdError::InvalidPolicy { .. }))
        ));
    }

    #[test]
    fn test_works_with_shared_stub_embedder() {
        let embedder = std::sync::Arc::new(BertEmbedder::stub().unwrap());
        let verifier = SplitVerifier::new(embedder.clone());
        let result = verifier
            .verify(
                "disconnect battery terminals then remove mounting bolts",
                "disconnect battery terminals",
                "then remove mounting bolts",
                false,
            )
            .unwrap();
        assert!(result.overall_valid, "{result}");
        assert_eq!(std::sync::Arc::strong_count(&embedder), 2);
    }
}

mod error_tests {
    use super::*;

    struct ShortBatchProvider;

    impl EmbeddingProvider for ShortBatchProvider {
        fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
            Ok(vec![1.0, 0.0])
        }

        fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
            Ok(vec![vec![1.0, 0.0]])
        }

        fn token_count(&self, _text: &str) -> Result<usize, EmbeddingError> {
            Ok(4)
        }

        fn embedding_dim(&self) -> usize {
            2
        }

        fn max_seq_len(&self) -> usize {
            128
        }
    }

    #[test]
    fn test_provider_failure_propagates() {
        let verifier = SplitVerifier::new(MockEmbeddingProvider::failing("connection reset"));
        let err = verifier.verify(PARENT, FIRST, SECOND, false).unwrap_err();

        assert!(err.is_external());
        match err {
            VerifyError::Embedding(EmbeddingError::Unavailable { reason }) => {
                assert_eq!(reason, "connection reset");
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_embedding_propagates() {
        let provider = MockEmbeddingProvider::new(3).with_embedding(PARENT, vec![1.0, 0.0, 0.0]);
        let verifier = SplitVerifier::new(provider);
        let err = verifier.verify(PARENT, FIRST, SECOND, false).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Embedding(EmbeddingError::InferenceFailed { .. })
        ));
    }

    #[test]
    fn test_wrong_dimension_is_malformed() {
        let provider = split_provider().with_embedding(SECOND, vec![0.0, 1.0]);
        let verifier = SplitVerifier::new(provider);
        let err = verifier.verify(PARENT, FIRST, SECOND, false).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Embedding(EmbeddingError::MalformedEmbedding { .. })
        ));
    }

    #[test]
    fn test_non_finite_embedding_is_malformed() {
        let provider = split_provider().with_embedding(FIRST, vec![f32::NAN, 0.0, 0.0]);
        let verifier = SplitVerifier::new(provider);
        let err = verifier.verify(PARENT, FIRST, SECOND, false).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Embedding(EmbeddingError::MalformedEmbedding { .. })
        ));
    }

    #[test]
    fn test_short_batch_is_malformed() {
        let verifier = SplitVerifier::new(ShortBatchProvider);
        let err = verifier.verify(PARENT, FIRST, SECOND, false).unwrap_err();
        assert!(err.is_external());
        assert!(err.to_string().contains("expected 4 embeddings, got 1"));
    }
}
