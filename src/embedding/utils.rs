use std::path::Path;

use tokenizers::{Tokenizer, TruncationParams};

use super::error::EmbeddingError;

/// Loads a `tokenizer.json` file.
pub fn load_tokenizer(path: &Path) -> Result<Tokenizer, EmbeddingError> {
    if !path.exists() {
        return Err(EmbeddingError::ModelNotFound {
            path: path.to_path_buf(),
        });
    }

    Tokenizer::from_file(path).map_err(|e| EmbeddingError::TokenizationFailed {
        reason: format!("Failed to load tokenizer from {}: {}", path.display(), e),
    })
}

/// Loads `tokenizer.json` from `model_dir`, truncating encodings to `max_len` tokens.
///
/// Padding is disabled: texts are encoded one at a time.
pub fn load_tokenizer_with_truncation(
    model_dir: &Path,
    max_len: usize,
) -> Result<Tokenizer, EmbeddingError> {
    let mut tokenizer = load_tokenizer(&model_dir.join("tokenizer.json"))?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to configure truncation: {}", e),
        })?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
