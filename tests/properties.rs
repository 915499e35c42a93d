use proptest::prelude::*;

use tf_idf_recommender::{MemorySource, Recommender, RecommenderConfig};

const WORDS: [&str; 8] = ["array", "plot", "model", "fit", "data", "image", "color", "axis"];

/// corpus of 1..10 documents built from a small vocabulary
/// (empty documents included)
fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(prop::sample::select(WORDS.to_vec()), 0..12)
            .prop_map(|words| words.join(" ")),
        1..10,
    )
}

fn fit(texts: &[String], n_examples: i64) -> (Recommender, Vec<String>) {
    let ids: Vec<String> = (0..texts.len()).map(|i| format!("ex{i}.py")).collect();
    let source: MemorySource = ids.iter().cloned().zip(texts.iter().cloned()).collect();
    let mut rec = Recommender::new(RecommenderConfig::new().with_n_examples(n_examples));
    rec.fit(ids.clone(), &source).unwrap();
    (rec, ids)
}

proptest! {
    /// Property: similarity[i][i] == 1 for every document with tokens, 0 otherwise
    #[test]
    fn prop_self_similarity(texts in corpus_strategy()) {
        let (rec, _) = fit(&texts, 5);
        let sim = rec.similarity_matrix().unwrap();
        for (i, text) in texts.iter().enumerate() {
            if text.is_empty() {
                prop_assert_eq!(sim[(i, i)], 0.0);
            } else {
                prop_assert!((sim[(i, i)] - 1.0).abs() < 1e-9, "diag {} = {}", i, sim[(i, i)]);
            }
        }
    }

    /// Property: the similarity matrix is symmetric with values in [0, 1]
    #[test]
    fn prop_symmetric_and_bounded(texts in corpus_strategy()) {
        let (rec, _) = fit(&texts, 5);
        let sim = rec.similarity_matrix().unwrap();
        prop_assert!(sim.is_symmetric(1e-12));
        prop_assert!(sim.as_slice().iter().all(|&v| (-1e-12..=1.0 + 1e-9).contains(&v)));
    }

    /// Property: predict never returns the query and returns min(n, n_docs - 1) documents
    #[test]
    fn prop_no_self_recommendation_and_bounded_size(
        texts in corpus_strategy(),
        n_examples in 1i64..12,
    ) {
        let (rec, ids) = fit(&texts, n_examples);
        let expected_len = (n_examples as usize).min(ids.len() - 1);
        for id in &ids {
            let recs = rec.predict(id).unwrap();
            prop_assert!(!recs.contains(id));
            prop_assert_eq!(recs.len(), expected_len);
            // no duplicates
            let mut unique = recs.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), recs.len());
        }
    }

    /// Property: scores are non-increasing, equal scores in corpus order
    #[test]
    fn prop_ranking_order(texts in corpus_strategy()) {
        let (rec, ids) = fit(&texts, 10);
        for id in &ids {
            let hits = rec.predict_scored(id).unwrap();
            for pair in hits.list.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].position < pair[1].position);
                }
            }
        }
    }

    /// Property: fitting the same corpus twice gives identical results
    #[test]
    fn prop_deterministic(texts in corpus_strategy()) {
        let (a, _) = fit(&texts, 3);
        let (b, _) = fit(&texts, 3);
        prop_assert_eq!(a.similarity_matrix().unwrap(), b.similarity_matrix().unwrap());
        prop_assert_eq!(a.predict_all().unwrap(), b.predict_all().unwrap());
    }
}
