use tracing::{debug, info};

use crate::embedding::{
    Embedding, EmbeddingError, EmbeddingProvider, cosine_similarity, validate_embedding,
};
use crate::threshold::{TaskType, ThresholdPolicy};

use super::error::VerifyError;
use super::types::VerificationResult;

/// Decides whether two sub-tasks form a valid split of a parent task.
///
/// The provider is injected once and reused across calls; no state is carried
/// between [`verify`](Self::verify) calls.
pub struct SplitVerifier<P> {
    provider: P,
    policy: ThresholdPolicy,
}

impl<P: std::fmt::Debug> std::fmt::Debug for SplitVerifier<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitVerifier")
            .field("provider", &self.provider)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<P: EmbeddingProvider> SplitVerifier<P> {
    /// Creates a verifier with the default threshold policy.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            policy: ThresholdPolicy::default(),
        }
    }

    /// Creates a verifier with a custom (validated) threshold policy.
    pub fn with_policy(provider: P, policy: ThresholdPolicy) -> Result<Self, VerifyError> {
        policy.validate()?;
        Ok(Self { provider, policy })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Verifies that `first` and `second` split `parent`.
    ///
    /// With `verbose`, every intermediate value is logged at `info`; otherwise at `debug`.
    /// The result is the same either way.
    pub fn verify(
        &self,
        parent: &str,
        first: &str,
        second: &str,
        verbose: bool,
    ) -> Result<VerificationResult, VerifyError> {
        let combined = format!("{} {}", first, second);

        let [emb_parent, emb_combined, emb_first, emb_second] =
            self.embed_all([parent, combined.as_str(), first, second])?;

        let union_similarity = cosine_similarity(&emb_parent, &emb_combined);
        let intersection_similarity = cosine_similarity(&emb_first, &emb_second);

        let union_threshold = self
            .policy
            .threshold(&self.provider, parent, TaskType::Union)?;
        let intersection_threshold =
            self.policy
                .threshold(&self.provider, parent, TaskType::Intersection)?;

        let result = VerificationResult::from_scores(
            union_similarity,
            union_threshold,
            intersection_similarity,
            intersection_threshold,
        );

        if verbose {
            info!(parent, first, second, combined = %combined, "Verifying task split");
            info!(
                union_similarity,
                union_threshold,
                intersection_similarity,
                intersection_threshold,
                is_union_valid = result.is_union_valid,
                is_intersection_valid = result.is_intersection_valid,
                status = result.debug_status(),
                "Task split verified"
            );
        } else {
            debug!(
                parent_len = parent.len(),
                first_len = first.len(),
                second_len = second.len(),
                union_similarity,
                union_threshold,
                intersection_similarity,
                intersection_threshold,
                status = result.debug_status(),
                "Task split verified"
            );
        }

        Ok(result)
    }

    /// Embeds the texts as one batch of distinct strings, validating every vector.
    fn embed_all<const N: usize>(&self, texts: [&str; N]) -> Result<[Embedding; N], VerifyError> {
        let mut unique: Vec<&str> = Vec::with_capacity(N);
        let slots: [usize; N] = texts.map(|text| match unique.iter().position(|u| *u == text) {
            Some(idx) => idx,
            None => {
                unique.push(text);
                unique.len() - 1
            }
        });

        let embeddings = self.provider.embed_batch(&unique)?;
        if embeddings.len() != unique.len() {
            return Err(EmbeddingError::MalformedEmbedding {
                reason: format!(
                    "expected {} embeddings, got {}",
                    unique.len(),
                    embeddings.len()
                ),
            }
            .into());
        }

        let expected_dim = self.provider.embedding_dim();
        for embedding in &embeddings {
            validate_embedding(embedding, expected_dim)?;
        }

        debug!(
            requested = N,
            embedded = unique.len(),
            "Embedded verification texts"
        );

        Ok(slots.map(|idx| embeddings[idx].clone()))
    }
}
