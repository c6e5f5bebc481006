//! Lexical n-gram similarity (Jaccard index over n-gram sets).
//!
//! Two granularities are supported through [`NGramMode`]:
//!
//! - [`NGramMode::Character`]: sliding windows of `n` characters.
//! - [`NGramMode::Word`]: `n` consecutive whitespace-delimited words, rejoined with a single space.
//!
//! # Empty Inputs
//!
//! The two modes disagree when *both* inputs are empty: word mode treats two empty
//! strings as identical (`1.0`), character mode treats them as carrying no signal (`0.0`).
//! Callers comparing scores across modes must account for this.

mod error;


pub use error::NGramError;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Unit an n-gram is built from.
pub enum NGramMode {
    /// Contiguous character windows.
    Character,
    /// Consecutive whitespace-delimited words.
    #[default]
    Word,
}

impl NGramMode {
    /// Similarity returned when both inputs are empty strings.
    pub fn empty_pair_similarity(&self) -> f32 {
        match self {
            NGramMode::Character => 0.0,
            NGramMode::Word => 1.0,
        }
    }

    /// Builds the n-gram set of `text` for this mode.
    pub fn ngrams(&self, text: &str, n: usize) -> Result<HashSet<String>, NGramError> {
        match self {
            NGramMode::Character => char_ngrams(text, n),
            NGramMode::Word => word_ngrams(text, n),
        }
    }
}

impl fmt::Display for NGramMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NGramMode::Character => write!(f, "character"),
            NGramMode::Word => write!(f, "word"),
        }
    }
}

impl FromStr for NGramMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "character" | "char" => Ok(NGramMode::Character),
            "word" => Ok(NGramMode::Word),
            other => Err(format!(
                "unknown n-gram mode '{other}' (expected 'character' or 'word')"
            )),
        }
    }
}

fn check_width(n: usize) -> Result<(), NGramError> {
    if n == 0 {
        return Err(NGramError::InvalidWidth { n });
    }
    Ok(())
}

/// Returns the set of `n`-character windows of `text`.
///
/// Windows are taken over Unicode scalar values, so multi-byte characters count once.
/// Returns an empty set when `text` has fewer than `n` characters.
pub fn char_ngrams(text: &str, n: usize) -> Result<HashSet<String>, NGramError> {
    check_width(n)?;

    let chars: Vec<char> = text.chars().collect();
    if chars.len() < n {
        return Ok(HashSet::new());
    }

    Ok(chars
        .windows(n)
        .map(|window| window.iter().collect())
        .collect())
}

/// Returns the set of `n`-word sequences of `text`, each joined with a single space.
///
/// Returns an empty set when `text` has fewer than `n` words.
pub fn word_ngrams(text: &str, n: usize) -> Result<HashSet<String>, NGramError> {
    check_width(n)?;

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < n {
        return Ok(HashSet::new());
    }

    Ok(words.windows(n).map(|window| window.join(" ")).collect())
}

/// Jaccard similarity between the `n`-gram sets of two strings.
///
/// Degenerate inputs never error:
/// - both empty: [`NGramMode::empty_pair_similarity`]
/// - exactly one empty: `0.0`
/// - neither yields an n-gram: `1.0` if the strings are equal, else `0.0`
/// - only one yields an n-gram: `0.0`
///
/// Only `n == 0` is rejected.
pub fn ngram_similarity(
    first: &str,
    second: &str,
    n: usize,
    mode: NGramMode,
) -> Result<f32, NGramError> {
    check_width(n)?;

    if first.is_empty() && second.is_empty() {
        return Ok(mode.empty_pair_similarity());
    }
    if first.is_empty() || second.is_empty() {
        return Ok(0.0);
    }

    let first_grams = mode.ngrams(first, n)?;
    let second_grams = mode.ngrams(second, n)?;

    match (first_grams.is_empty(), second_grams.is_empty()) {
        (true, true) => return Ok(if first == second { 1.0 } else { 0.0 }),
        (true, false) | (false, true) => return Ok(0.0),
        (false, false) => {}
    }

    let common = first_grams.intersection(&second_grams).count();
    let union = first_grams.len() + second_grams.len() - common;
    let similarity = common as f32 / union as f32;

    debug!(
        %mode,
        n,
        first_grams = first_grams.len(),
        second_grams = second_grams.len(),
        common,
        similarity,
        "Computed n-gram similarity"
    );

    Ok(similarity)
}

/// Computes [`ngram_similarity`] for every width in `widths`, in order.
pub fn ngram_sweep<I>(
    first: &str,
    second: &str,
    widths: I,
    mode: NGramMode,
) -> Result<Vec<(usize, f32)>, NGramError>
where
    I: IntoIterator<Item = usize>,
{
    widths
        .into_iter()
        .map(|n| Ok((n, ngram_similarity(first, second, n, mode)?)))
        .collect()
}
