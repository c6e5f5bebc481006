//! Task-split verification.
//!
//! Given a parent task `C` and candidate sub-tasks `A` and `B`, [`SplitVerifier`] checks:
//!
//! - **union**: `cos(C, A + " " + B) >= threshold(C, union)`
//! - **intersection**: `cos(A, B) <= threshold(C, intersection)`
//!
//! The split is valid only if both hold. Thresholds come from
//! [`ThresholdPolicy`](crate::threshold::ThresholdPolicy) and depend on the parent's length only.

pub mod error;
pub mod types;
pub mod verifier;

#[cfg(test)]
mod tests;

pub use error::VerifyError;
pub use types::VerificationResult;
pub use verifier::SplitVerifier;
