pub mod compare;
pub mod dict;
pub mod tfidf;
pub mod token;
pub mod tokenizer;

pub use compare::{cosine_similarity, cosine_similarity_sparse};
pub use dict::{DictVectorizer, Vocabulary};
pub use tfidf::{DefaultTFIDFEngine, TFIDFEngine};
pub use token::TokenFrequency;
pub use tokenizer::{BackreferenceTokenizer, RawTextTokenizer, Tokenizer, TokenizerMode};
