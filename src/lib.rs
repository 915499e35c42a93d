//! This crate computes content-based "related documents" recommendations
//! with TF-IDF weighting and cosine similarity.

pub mod error;
pub mod recommender;
pub mod utils;
pub mod vectorizer;

/// Recommender
/// The top-level struct of this crate.
/// `fit` turns a list of document identifiers into a pairwise similarity
/// matrix, `predict` returns the most similar other documents of one of them.
///
/// Internally, one fit runs:
/// - Tokenization of each document (`Tokenizer`)
/// - A counts matrix over the sorted vocabulary (`DictVectorizer`)
/// - Smoothed TF-IDF weighting with L2 row normalization (`TFIDFEngine`)
/// - Full pairwise cosine similarity (`cosine_similarity`)
///
/// `Recommender<E>` is generic over the TF-IDF engine `E`
/// (default: `DefaultTFIDFEngine`).
///
/// # Thread Safety
/// The fitted model is an immutable `Arc` snapshot.
/// `predict` takes `&self` and can run from many threads at once.
pub use recommender::Recommender;

/// Fitted model snapshot (document identifiers + similarity matrix)
pub use recommender::FittedModel;

/// Recommender options
/// - `n_examples`: number of neighbours, default 5
/// - `tokenizer`: `"raw"` or `"backrefs"`, default `"raw"`
///
/// # Serialization
/// Supported (serde, all fields optional).
pub use recommender::config::RecommenderConfig;

/// Document collaborators
/// `DocumentSource` supplies text (raw mode) or backreference names
/// (backrefs mode). `FsSource` reads files, `MemorySource` keeps everything
/// in memory.
pub use recommender::source::{DocumentSource, FsSource, MemorySource};

/// Ranked neighbours with scores
pub use recommender::ranking::{HitEntry, Hits};

/// Token Frequency structure
/// token occurrence counts of one document
pub use vectorizer::token::TokenFrequency;

/// Tokenization strategies
pub use vectorizer::tokenizer::{BackreferenceTokenizer, RawTextTokenizer, Tokenizer, TokenizerMode};

/// TF IDF Calculation Engine Trait
/// By implementing this trait, you can plug different IDF weighting
/// strategies into `Recommender<E>`.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Sparse and dense matrices
pub use utils::math::{CsrMatrix, DenseMatrix};

/// Error type
pub use error::{RecommendError, Result};
