//! Length-adaptive acceptance thresholds.
//!
//! ```text
//! threshold = max(floor, base × decay^(min(tokens, max_tokens) / 10))
//! ```
//!
//! Both bases relax as the parent text grows. For the union check that makes acceptance
//! easier. For the intersection check (`similarity <= threshold`) a lower threshold makes
//! acceptance *harder*, so long parents demand more clearly disjoint sub-tasks.

mod error;


pub use error::ThresholdError;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::constants::{
    DEFAULT_MAX_SEQ_LEN, INTERSECTION_BASE_THRESHOLD, THRESHOLD_DECAY_FACTOR,
    THRESHOLD_DECAY_STEP, THRESHOLD_FLOOR, UNION_BASE_THRESHOLD,
};
use crate::embedding::EmbeddingProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which side of the split decision a threshold applies to.
pub enum TaskType {
    /// `A + B` must stay close to the parent.
    Union,
    /// `A` and `B` must stay apart.
    Intersection,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Union => "union",
            TaskType::Intersection => "intersection",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union" => Ok(TaskType::Union),
            "intersection" => Ok(TaskType::Intersection),
            other => Err(ThresholdError::UnknownTaskType {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Parameters of the exponential-decay threshold.
pub struct ThresholdPolicy {
    /// Base threshold for [`TaskType::Union`]. Default: `0.85`.
    pub union_base: f32,
    /// Base threshold for [`TaskType::Intersection`]. Default: `0.35`.
    pub intersection_base: f32,
    /// Decay applied per ten tokens. Default: `0.95`.
    pub decay_factor: f32,
    /// Lowest threshold ever returned. Default: `0.1`.
    pub floor: f32,
    /// Token lengths above this are clamped before decaying. Default: `128`.
    pub max_tokens: usize,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            union_base: UNION_BASE_THRESHOLD,
            intersection_base: INTERSECTION_BASE_THRESHOLD,
            decay_factor: THRESHOLD_DECAY_FACTOR,
            floor: THRESHOLD_FLOOR,
            max_tokens: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl ThresholdPolicy {
    /// Checks every parameter lies in `(0, 1]` and `max_tokens` is non-zero.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let unit = |name: &str, value: f32| {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(ThresholdError::InvalidPolicy {
                    reason: format!("{name} must be in (0, 1], got {value}"),
                })
            }
        };

        unit("union_base", self.union_base)?;
        unit("intersection_base", self.intersection_base)?;
        unit("decay_factor", self.decay_factor)?;
        unit("floor", self.floor)?;

        if self.max_tokens == 0 {
            return Err(ThresholdError::InvalidPolicy {
                reason: "max_tokens must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Base threshold before any decay.
    pub fn base(&self, task_type: TaskType) -> f32 {
        match task_type {
            TaskType::Union => self.union_base,
            TaskType::Intersection => self.intersection_base,
        }
    }

    /// Threshold for a known token length. Pure; non-increasing in `token_length`.
    pub fn threshold_for_length(&self, task_type: TaskType, token_length: usize) -> f32 {
        let token_length = token_length.min(self.max_tokens);
        let exponent = token_length as f32 / THRESHOLD_DECAY_STEP;
        let decayed = self.base(task_type) * self.decay_factor.powf(exponent);
        decayed.max(self.floor)
    }

    /// Threshold for `text`, measuring its length with the provider's tokenizer.
    pub fn threshold<P>(
        &self,
        provider: &P,
        text: &str,
        task_type: TaskType,
    ) -> Result<f32, ThresholdError>
    where
        P: EmbeddingProvider + ?Sized,
    {
        let token_length = provider.token_count(text)?;
        let threshold = self.threshold_for_length(task_type, token_length);

        debug!(
            %task_type,
            token_length,
            threshold,
            "Computed dynamic threshold"
        );

        Ok(threshold)
    }
}

/// [`ThresholdPolicy::threshold`] with the default policy.
pub fn dynamic_threshold<P>(
    provider: &P,
    text: &str,
    task_type: TaskType,
) -> Result<f32, ThresholdError>
where
    P: EmbeddingProvider + ?Sized,
{
    ThresholdPolicy::default().threshold(provider, text, task_type)
}
