use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NGramError {
    #[error("invalid n-gram width {n}: must be at least 1")]
    InvalidWidth { n: usize },
}
