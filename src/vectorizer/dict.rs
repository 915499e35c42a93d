use indexmap::IndexSet;

use crate::utils::math::CsrMatrix;
use crate::vectorizer::token::TokenFrequency;

/// Corpus vocabulary
/// token -> feature index, indices assigned in ascending lexicographic order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    /// Union of all tokens of all documents, sorted
    /// the result does not depend on document order
    pub fn from_frequencies(freqs: &[TokenFrequency]) -> Self {
        let mut terms: IndexSet<Box<str>> = freqs
            .iter()
            .flat_map(|freq| freq.iter().map(|(token, _)| Box::<str>::from(token)))
            .collect();
        terms.sort_unstable();
        Self { terms }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// feature index of a token
    #[inline]
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.terms.get_index_of(token)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.terms.iter().map(|t| t.as_ref())
    }
}

/// Per-document frequency maps -> sparse counts matrix
#[derive(Debug, Clone, Copy, Default)]
pub struct DictVectorizer;

impl DictVectorizer {
    /// Build the vocabulary and the counts matrix of shape
    /// `(freqs.len(), vocabulary.len())`
    ///
    /// Row i holds the counts of document i, columns in vocabulary order.
    /// A document without tokens gives an all-zero row.
    pub fn fit_transform(freqs: &[TokenFrequency]) -> (Vocabulary, CsrMatrix<u32>) {
        let vocabulary = Vocabulary::from_frequencies(freqs);
        let matrix = Self::transform(&vocabulary, freqs);
        (vocabulary, matrix)
    }

    /// Counts matrix over an existing vocabulary
    /// tokens outside the vocabulary are ignored
    pub fn transform(vocabulary: &Vocabulary, freqs: &[TokenFrequency]) -> CsrMatrix<u32> {
        let nnz = freqs.iter().map(TokenFrequency::token_num).sum();
        let mut matrix = CsrMatrix::with_capacity(vocabulary.len(), freqs.len(), nnz);
        let mut row: Vec<(usize, u32)> = Vec::new();
        for freq in freqs {
            row.clear();
            row.extend(
                freq.iter()
                    .filter_map(|(token, count)| vocabulary.index_of(token).map(|j| (j, count))),
            );
            // vocabulary order
            row.sort_unstable_by_key(|&(j, _)| j);
            matrix.push_row(row.iter().copied());
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<TokenFrequency> {
        ["cat dog dog", "dog bird", "cat cat bird"]
            .iter()
            .map(|t| TokenFrequency::from_text(t))
            .collect()
    }

    #[test]
    fn vocabulary_is_sorted() {
        let vocab = Vocabulary::from_frequencies(&corpus());
        assert_eq!(vocab.iter().collect::<Vec<_>>(), vec!["bird", "cat", "dog"]);
        assert_eq!(vocab.index_of("dog"), Some(2));
        assert_eq!(vocab.index_of("fish"), None);
    }

    #[test]
    fn vocabulary_ignores_document_order() {
        let mut reversed = corpus();
        reversed.reverse();
        assert_eq!(
            Vocabulary::from_frequencies(&corpus()),
            Vocabulary::from_frequencies(&reversed)
        );
    }

    #[test]
    fn counts_matrix_matches_worked_example() {
        let (vocab, x) = DictVectorizer::fit_transform(&corpus());
        assert_eq!(vocab.len(), 3);
        assert_eq!(x.shape(), (3, 3));
        assert_eq!(x.to_dense(), vec![vec![0, 1, 2], vec![1, 0, 1], vec![1, 2, 0]]);
        assert_eq!(x.indptr(), &[0, 2, 4, 6]);
        assert_eq!(x.indices(), &[1, 2, 0, 2, 0, 1]);
    }

    #[test]
    fn empty_document_is_zero_row() {
        let freqs = vec![
            TokenFrequency::from_text("alpha"),
            TokenFrequency::new(),
            TokenFrequency::from_text("beta"),
        ];
        let (_, x) = DictVectorizer::fit_transform(&freqs);
        assert_eq!(x.shape(), (3, 2));
        assert_eq!(x.indptr()[1], x.indptr()[2]);
    }

    #[test]
    fn empty_corpus_is_empty_matrix() {
        let (vocab, x) = DictVectorizer::fit_transform(&[]);
        assert!(vocab.is_empty());
        assert_eq!(x.shape(), (0, 0));
        assert_eq!(x.indptr(), &[0]);
    }

    #[test]
    fn transform_skips_unknown_tokens() {
        let (vocab, _) = DictVectorizer::fit_transform(&corpus());
        let x = DictVectorizer::transform(&vocab, &[TokenFrequency::from_text("fish dog")]);
        assert_eq!(x.to_dense(), vec![vec![0, 0, 1]]);
    }
}
