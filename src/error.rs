use thiserror::Error;

/// Boxed error coming back from a document collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by fitting, ranking and matrix construction.
///
/// Every operation is deterministic and in-memory, so nothing here is retried.
/// A failed `fit` leaves the previously published model untouched.
#[derive(Error, Debug)]
pub enum RecommendError {
    /// unknown tokenizer mode, or a non-positive neighbour count
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// the queried identifier is not part of the fitted corpus
    #[error("document not found: {0}")]
    NotFound(String),

    /// predict was called before any successful fit
    #[error("recommender is not fitted yet, call fit() first")]
    Unfitted,

    /// the same identifier was given twice to fit
    #[error("duplicate document identifier: {0}")]
    DuplicateDocument(String),

    /// the text / backreference collaborator failed for one document
    #[error("failed to acquire document `{id}`: {source}")]
    Source {
        id: String,
        #[source]
        source: BoxError,
    },

    /// X and Y disagree on the number of features
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// raw CSR parts break the row-compressed invariants
    #[error("invalid sparse matrix: {0}")]
    InvalidMatrix(String),
}

impl RecommendError {
    pub fn invalid_configuration<S: Into<String>>(msg: S) -> Self {
        RecommendError::InvalidConfiguration(msg.into())
    }

    pub fn invalid_matrix<S: Into<String>>(msg: S) -> Self {
        RecommendError::InvalidMatrix(msg.into())
    }

    pub fn source<S: Into<String>>(id: S, source: BoxError) -> Self {
        RecommendError::Source { id: id.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
