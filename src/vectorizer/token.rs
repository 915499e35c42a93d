use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

/// word token: maximal run of alphanumeric / underscore characters
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+").expect("static word pattern is valid")
});

///  TokenFrequency 構造体
/// 1文書内のtokenの出現回数を管理するための構造体です
/// DictVectorizer の入力になります
///
/// # Examples
/// ```
/// use tf_idf_recommender::vectorizer::token::TokenFrequency;
///
/// let freq = TokenFrequency::from_text("Dog cat dog");
/// assert_eq!(freq.token_count("dog"), 2);
/// assert_eq!(freq.token_count("cat"), 1);
/// assert_eq!(freq.token_num(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    token_count: IndexMap<String, u32>,
}

/// 生成
impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: IndexMap::new(),
        }
    }

    /// Raw text を lower-case の word token に分割して数える
    ///
    /// # Arguments
    /// * `text` - document text
    pub fn from_text(text: &str) -> Self {
        let mut freq = Self::new();
        for m in WORD.find_iter(text) {
            freq.add_token(&m.as_str().to_lowercase());
        }
        freq
    }

    /// 既にtoken化済みの列をそのまま数える
    /// (no lowering, no splitting)
    ///
    /// # Arguments
    /// * `tokens` - pre-tokenized sequence, e.g. cross-reference names
    pub fn from_tokens<T>(tokens: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        let mut freq = Self::new();
        freq.add_tokens(tokens);
        freq
    }
}

/// Tokenの追加
impl TokenFrequency {
    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - 追加するトークン
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        if let Some(count) = self.token_count.get_mut(token) {
            *count += 1;
        } else {
            self.token_count.insert(token.to_string(), 1);
        }
        self
    }

    /// 複数のtokenを追加する
    ///
    /// # Arguments
    /// * `tokens` - 追加するトークンのスライス
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// TokenFrequencyの情報を取得するための実装
impl TokenFrequency {
    /// あるtokenの出現回数を取得します
    /// 無いtokenは0
    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// 出現した単語数 (unique)
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    /// (token, count) in first-seen order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.token_count.iter().map(|(token, &count)| (token.as_str(), count))
    }
}
