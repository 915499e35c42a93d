pub mod config;
pub mod ranking;
pub mod source;

use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::{RecommendError, Result};
use crate::utils::math::DenseMatrix;
use crate::vectorizer::compare::cosine_similarity;
use crate::vectorizer::dict::DictVectorizer;
use crate::vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};
use crate::vectorizer::token::TokenFrequency;
use crate::vectorizer::tokenizer::TokenizerMode;

use config::{RecommenderConfig, ValidConfig};
use ranking::{rank_row, HitEntry, Hits};
use source::DocumentSource;

/// Result of one successful `fit`
/// immutable once published; position i in `documents` is row/column i
/// of `similarity`
#[derive(Debug)]
pub struct FittedModel {
    documents: IndexSet<String>,
    similarity: DenseMatrix,
    n_features: usize,
    config: ValidConfig,
}

impl FittedModel {
    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// document identifiers in corpus order
    pub fn document_ids(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.documents.iter().map(String::as_str)
    }

    #[inline]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.documents.get_index_of(id)
    }

    #[inline]
    pub fn similarity(&self) -> &DenseMatrix {
        &self.similarity
    }

    /// vocabulary size of the fitted corpus
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn n_examples(&self) -> usize {
        self.config.n_examples.get()
    }

    #[inline]
    pub fn mode(&self) -> TokenizerMode {
        self.config.mode
    }

    /// Up to `n` most similar other documents of `id`
    pub fn neighbours(&self, id: &str, n: usize) -> Result<Hits<String>> {
        let not_found = || RecommendError::NotFound(id.to_string());
        let pos = self.position(id).ok_or_else(not_found)?;
        let row = self.similarity.row(pos).ok_or_else(not_found)?;
        let list = rank_row(row, pos, n)
            .list
            .into_iter()
            .filter_map(|e| {
                self.documents.get_index(e.position).map(|key| HitEntry {
                    key: key.clone(),
                    score: e.score,
                    position: e.position,
                })
            })
            .collect();
        Ok(Hits::new(list))
    }
}

/// Content-based "related documents" recommender
///
/// `fit` tokenizes every document, builds the counts matrix over a sorted
/// vocabulary, weights it with `E` and computes all pairwise cosine
/// similarities. `predict` only ranks one precomputed row.
///
/// The fitted state is an `Arc<FittedModel>` swapped in as a whole after
/// every stage succeeded, so a failing `fit` keeps the previous model and
/// `predict` never sees a half-built one.
///
/// # Examples
/// ```
/// use tf_idf_recommender::{MemorySource, Recommender, RecommenderConfig};
///
/// let source: MemorySource = [
///     ("doc0", "cat dog dog"),
///     ("doc1", "dog bird"),
///     ("doc2", "cat cat bird"),
/// ]
/// .into_iter()
/// .collect();
///
/// let mut recommender = Recommender::new(RecommenderConfig::new().with_n_examples(1));
/// recommender.fit(["doc0", "doc1", "doc2"], &source).unwrap();
/// assert_eq!(recommender.predict("doc0").unwrap(), vec!["doc1".to_string()]);
/// ```
#[derive(Debug)]
pub struct Recommender<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    config: RecommenderConfig,
    fitted: Option<Arc<FittedModel>>,
    _marker: PhantomData<E>,
}

impl Recommender<DefaultTFIDFEngine> {
    pub fn new(config: RecommenderConfig) -> Self {
        Self::with_engine(config)
    }
}

impl Default for Recommender<DefaultTFIDFEngine> {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}

impl<E> Recommender<E>
where
    E: TFIDFEngine,
{
    /// recommender weighting with a custom TF-IDF engine
    pub fn with_engine(config: RecommenderConfig) -> Self {
        Self {
            config,
            fitted: None,
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// takes effect on the next `fit`
    pub fn set_config(&mut self, config: RecommenderConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Fit the recommender on an ordered list of document identifiers
    ///
    /// Nothing is read before the configuration and the identifier list are
    /// validated. On any error the previously fitted model stays in place.
    ///
    /// # Arguments
    /// * `ids` - document identifiers, their order fixes matrix positions
    /// * `source` - text / backreference collaborator
    pub fn fit<I, S>(&mut self, ids: I, source: &dyn DocumentSource) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let config = self.config.validate()?;

        let mut documents = IndexSet::new();
        for id in ids {
            let id: String = id.into();
            if documents.contains(&id) {
                return Err(RecommendError::DuplicateDocument(id));
            }
            documents.insert(id);
        }

        let model = Self::build_model(documents, config, source)?;
        info!(
            "fitted {} documents over {} features ({} tokenizer)",
            model.len(),
            model.n_features(),
            model.mode()
        );
        self.fitted = Some(Arc::new(model));
        Ok(self)
    }

    fn build_model(
        documents: IndexSet<String>,
        config: ValidConfig,
        source: &dyn DocumentSource,
    ) -> Result<FittedModel> {
        let tokenizer = config.mode.tokenizer();
        let freqs: Vec<TokenFrequency> = documents
            .par_iter()
            .map(|id| tokenizer.token_frequency(id, source))
            .collect::<Result<_>>()?;
        debug!("tokenized {} documents", freqs.len());
        for (id, freq) in documents.iter().zip(&freqs) {
            if freq.is_empty() {
                warn!("document `{id}` has no tokens, it will not be similar to anything");
            }
        }

        let (vocabulary, counts) = DictVectorizer::fit_transform(&freqs);
        debug!(
            "counts matrix {:?}, vocabulary {}, nnz {}",
            counts.shape(),
            vocabulary.len(),
            counts.nnz()
        );

        let tfidf = E::tfidf(&counts);
        let similarity = cosine_similarity(&tfidf, None)?;
        debug!("similarity matrix {:?}", similarity.shape());

        Ok(FittedModel {
            documents,
            similarity,
            n_features: vocabulary.len(),
            config,
        })
    }

    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// snapshot of the current model
    pub fn fitted(&self) -> Result<Arc<FittedModel>> {
        self.fitted.clone().ok_or(RecommendError::Unfitted)
    }

    pub fn similarity_matrix(&self) -> Result<&DenseMatrix> {
        self.model().map(FittedModel::similarity)
    }

    pub fn document_ids(&self) -> Result<Vec<&str>> {
        Ok(self.model()?.document_ids().collect())
    }

    /// The `n_examples` documents most similar to `id`, best first
    ///
    /// Ties keep corpus order. `id` itself is never returned; the result has
    /// `min(n_examples, n_documents - 1)` entries.
    pub fn predict(&self, id: &str) -> Result<Vec<String>> {
        Ok(self.predict_scored(id)?.into_keys())
    }

    /// Like [`Recommender::predict`] with scores and positions
    pub fn predict_scored(&self, id: &str) -> Result<Hits<String>> {
        let model = self.model()?;
        model.neighbours(id, model.n_examples())
    }

    /// Recommendations for every fitted document, in corpus order
    pub fn predict_all(&self) -> Result<IndexMap<String, Vec<String>>> {
        let model = self.model()?;
        let ids: Vec<&str> = model.document_ids().collect();
        let all: Vec<(String, Vec<String>)> = ids
            .par_iter()
            .map(|&id| -> Result<(String, Vec<String>)> {
                let hits = model.neighbours(id, model.n_examples())?;
                Ok((id.to_string(), hits.into_keys()))
            })
            .collect::<Result<_>>()?;
        Ok(all.into_iter().collect())
    }

    fn model(&self) -> Result<&FittedModel> {
        self.fitted.as_deref().ok_or(RecommendError::Unfitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommender::source::MemorySource;

    fn source() -> MemorySource {
        [
            ("doc0", "cat dog dog"),
            ("doc1", "dog bird"),
            ("doc2", "cat cat bird"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn predict_before_fit_is_unfitted() {
        let rec = Recommender::default();
        assert!(matches!(rec.predict("doc0"), Err(RecommendError::Unfitted)));
        assert!(matches!(rec.similarity_matrix(), Err(RecommendError::Unfitted)));
        assert!(!rec.is_fitted());
    }

    #[test]
    fn fit_builds_model() {
        let mut rec = Recommender::default();
        rec.fit(["doc0", "doc1", "doc2"], &source()).unwrap();
        let model = rec.fitted().unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model.n_features(), 3);
        assert_eq!(model.position("doc2"), Some(2));
        assert_eq!(rec.document_ids().unwrap(), vec!["doc0", "doc1", "doc2"]);
        assert!(model.similarity().is_symmetric(1e-12));
    }

    #[test]
    fn predict_ranks_by_similarity() {
        let mut rec = Recommender::default();
        rec.fit(["doc0", "doc1", "doc2"], &source()).unwrap();
        // default n_examples (5) is capped by the corpus
        assert_eq!(rec.predict("doc0").unwrap(), vec!["doc1", "doc2"]);

        let hits = rec.predict_scored("doc0").unwrap();
        assert!((hits.list[0].score - 2.0 / 10f64.sqrt()).abs() < 1e-9);
        assert!((hits.list[1].score - 0.4).abs() < 1e-9);
        assert_eq!(hits.list[0].position, 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut rec = Recommender::default();
        let err = rec.fit(["doc0", "doc1", "doc0"], &source()).unwrap_err();
        assert!(matches!(err, RecommendError::DuplicateDocument(id) if id == "doc0"));
        assert!(!rec.is_fitted());
    }

    #[test]
    fn backrefs_mode_uses_source_backrefs() {
        let source = MemorySource::new()
            .with_backrefs("a.py", ["np.zeros", "plt.plot"])
            .with_backrefs("b.py", ["np.zeros"])
            .with_backrefs("c.py", ["pd.DataFrame"]);
        let mut rec = Recommender::new(
            RecommenderConfig::new()
                .with_tokenizer("backrefs")
                .with_n_examples(1),
        );
        rec.fit(["a.py", "b.py", "c.py"], &source).unwrap();
        assert_eq!(rec.fitted().unwrap().mode(), TokenizerMode::Backrefs);
        assert_eq!(rec.predict("b.py").unwrap(), vec!["a.py"]);
    }

    #[test]
    fn predict_all_follows_corpus_order() {
        let mut rec = Recommender::new(RecommenderConfig::new().with_n_examples(1));
        rec.fit(["doc0", "doc1", "doc2"], &source()).unwrap();
        let all = rec.predict_all().unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["doc0", "doc1", "doc2"]);
        assert_eq!(all["doc0"], vec!["doc1"]);
        for (id, recs) in &all {
            assert_eq!(recs.len(), 1);
            assert!(!recs.contains(id));
        }
    }
}
