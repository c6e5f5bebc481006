use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
/// Outcome of one split verification, with every intermediate score.
pub struct VerificationResult {
    /// `cos(parent, first + " " + second)`.
    pub union_similarity: f32,
    /// Threshold the union similarity must reach.
    pub union_threshold: f32,
    /// `cos(first, second)`.
    pub intersection_similarity: f32,
    /// Threshold the intersection similarity must not exceed.
    pub intersection_threshold: f32,
    /// `union_similarity >= union_threshold`.
    pub is_union_valid: bool,
    /// `intersection_similarity <= intersection_threshold`.
    pub is_intersection_valid: bool,
    /// Both checks passed.
    pub overall_valid: bool,
}

impl VerificationResult {
    /// Applies the two-sided decision rule to the given scores.
    pub fn from_scores(
        union_similarity: f32,
        union_threshold: f32,
        intersection_similarity: f32,
        intersection_threshold: f32,
    ) -> Self {
        let is_union_valid = union_similarity >= union_threshold;
        let is_intersection_valid = intersection_similarity <= intersection_threshold;

        Self {
            union_similarity,
            union_threshold,
            intersection_similarity,
            intersection_threshold,
            is_union_valid,
            is_intersection_valid,
            overall_valid: is_union_valid && is_intersection_valid,
        }
    }

    /// Returns a short status string.
    pub fn debug_status(&self) -> &'static str {
        match (self.is_union_valid, self.is_intersection_valid) {
            (true, true) => "VALID",
            (false, true) => "UNION_REJECTED",
            (true, false) => "INTERSECTION_REJECTED",
            (false, false) => "BOTH_REJECTED",
        }
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (union: {:.4} >= {:.4}, intersection: {:.4} <= {:.4})",
            self.debug_status(),
            self.union_similarity,
            self.union_threshold,
            self.intersection_similarity,
            self.intersection_threshold
        )
    }
}
