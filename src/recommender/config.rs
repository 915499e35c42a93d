use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::vectorizer::tokenizer::TokenizerMode;

pub const DEFAULT_N_EXAMPLES: i64 = 5;
pub const DEFAULT_TOKENIZER: &str = "raw";

/// Recommender options as handed over by the surrounding pipeline.
///
/// Kept loosely typed on purpose: any integer and any string deserialize,
/// and `validate` (called at the start of `fit`) decides what is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// number of neighbours to return, must be positive
    pub n_examples: i64,
    /// `"raw"` or `"backrefs"`
    pub tokenizer: String,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            n_examples: DEFAULT_N_EXAMPLES,
            tokenizer: DEFAULT_TOKENIZER.to_string(),
        }
    }
}

/// Checked configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidConfig {
    pub n_examples: NonZeroUsize,
    pub mode: TokenizerMode,
}

impl RecommenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_examples(mut self, n_examples: i64) -> Self {
        self.n_examples = n_examples;
        self
    }

    pub fn with_tokenizer<S: Into<String>>(mut self, tokenizer: S) -> Self {
        self.tokenizer = tokenizer.into();
        self
    }

    pub fn validate(&self) -> Result<ValidConfig> {
        let mode: TokenizerMode = self.tokenizer.parse()?;
        let n_examples = usize::try_from(self.n_examples)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                RecommendError::invalid_configuration(format!(
                    "n_examples must be strictly positive, got {}",
                    self.n_examples
                ))
            })?;
        Ok(ValidConfig { n_examples, mode })
    }
}
