use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RecommendError, Result};
use crate::recommender::source::DocumentSource;
use crate::vectorizer::token::TokenFrequency;

/// How a document is turned into tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerMode {
    /// lower-cased `\w+` words of the document text
    Raw,
    /// cross-reference names supplied by the document source
    Backrefs,
}

impl TokenizerMode {
    pub const ALL: [TokenizerMode; 2] = [TokenizerMode::Raw, TokenizerMode::Backrefs];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenizerMode::Raw => "raw",
            TokenizerMode::Backrefs => "backrefs",
        }
    }

    /// strategy object for this mode
    pub fn tokenizer(&self) -> Box<dyn Tokenizer> {
        match self {
            TokenizerMode::Raw => Box::new(RawTextTokenizer),
            TokenizerMode::Backrefs => Box::new(BackreferenceTokenizer),
        }
    }
}

impl fmt::Display for TokenizerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenizerMode {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        TokenizerMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = TokenizerMode::ALL.iter().map(|m| m.as_str()).collect();
                RecommendError::invalid_configuration(format!(
                    "unknown tokenizer `{s}`, expected one of {known:?}"
                ))
            })
    }
}

/// Tokenization strategy
/// fetches what it needs for one document from the source and counts tokens
pub trait Tokenizer: Send + Sync {
    fn mode(&self) -> TokenizerMode;

    /// # Arguments
    /// * `id` - document identifier
    /// * `source` - collaborator providing text or backreferences
    fn token_frequency(&self, id: &str, source: &dyn DocumentSource) -> Result<TokenFrequency>;
}

/// Splits the full document text into lower-cased words
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextTokenizer;

impl Tokenizer for RawTextTokenizer {
    fn mode(&self) -> TokenizerMode {
        TokenizerMode::Raw
    }

    fn token_frequency(&self, id: &str, source: &dyn DocumentSource) -> Result<TokenFrequency> {
        let text = source
            .read_text(id)
            .map_err(|e| RecommendError::source(id, e))?;
        Ok(TokenFrequency::from_text(&text))
    }
}

/// Counts a pre-built token sequence (cross-reference names) as is.
/// Building the cross-reference index is the source's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackreferenceTokenizer;

impl Tokenizer for BackreferenceTokenizer {
    fn mode(&self) -> TokenizerMode {
        TokenizerMode::Backrefs
    }

    fn token_frequency(&self, id: &str, source: &dyn DocumentSource) -> Result<TokenFrequency> {
        let backrefs = source
            .backrefs(id)
            .map_err(|e| RecommendError::source(id, e))?;
        Ok(TokenFrequency::from_tokens(&backrefs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommender::source::MemorySource;

    #[test]
    fn mode_parses_known_names() {
        assert_eq!("raw".parse::<TokenizerMode>().unwrap(), TokenizerMode::Raw);
        assert_eq!("backrefs".parse::<TokenizerMode>().unwrap(), TokenizerMode::Backrefs);
        assert_eq!(TokenizerMode::Backrefs.to_string(), "backrefs");
    }

    #[test]
    fn mode_rejects_unknown_names() {
        for name in ["unknown", "RAW", "", "backref"] {
            assert!(matches!(
                name.parse::<TokenizerMode>(),
                Err(RecommendError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn raw_tokenizer_reads_text() {
        let source = MemorySource::new().with_text("a.py", "Import numpy as np\nnp.zeros");
        let freq = RawTextTokenizer.token_frequency("a.py", &source).unwrap();
        assert_eq!(freq.token_count("np"), 2);
        assert_eq!(freq.token_count("import"), 1);
    }

    #[test]
    fn raw_tokenizer_reports_missing_text() {
        let source = MemorySource::new();
        let err = RawTextTokenizer.token_frequency("gone.py", &source).unwrap_err();
        match err {
            RecommendError::Source { id, .. } => assert_eq!(id, "gone.py"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn backreference_tokenizer_counts_names_verbatim() {
        let source = MemorySource::new()
            .with_backrefs("a.py", ["numpy.zeros", "numpy.zeros", "Matplotlib.Figure"]);
        let freq = BackreferenceTokenizer.token_frequency("a.py", &source).unwrap();
        assert_eq!(freq.token_count("numpy.zeros"), 2);
        assert_eq!(freq.token_count("Matplotlib.Figure"), 1);
        assert_eq!(TokenizerMode::Backrefs.tokenizer().mode(), TokenizerMode::Backrefs);
    }
}
