//! Cross-cutting, shared constants.
//!
//! The threshold constants define the default [`ThresholdPolicy`](crate::threshold::ThresholdPolicy);
//! the embedding constants describe the default BERT encoder.

/// Hidden size of `bert-base-uncased`, used by the stub embedder.
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Max tokens fed to the encoder (and counted by the threshold policy).
pub const DEFAULT_MAX_SEQ_LEN: usize = 128;

/// Base acceptance threshold for the union check.
pub const UNION_BASE_THRESHOLD: f32 = 0.85;

/// Base acceptance threshold for the intersection check.
pub const INTERSECTION_BASE_THRESHOLD: f32 = 0.35;

/// Per-ten-tokens decay applied to both base thresholds.
pub const THRESHOLD_DECAY_FACTOR: f32 = 0.95;

/// Lower bound for any computed threshold.
pub const THRESHOLD_FLOOR: f32 = 0.1;

/// Token-length divisor in the decay exponent.
pub const THRESHOLD_DECAY_STEP: f32 = 10.0;

/// Widest n-gram examined by the default sweep.
pub const DEFAULT_SWEEP_MAX_N: usize = 10;
