use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::BoxError;

/// Collaborator that supplies document content during `fit`.
///
/// Text acquisition and cross-reference indexing live outside the
/// recommender; failures come back boxed and are wrapped into
/// `RecommendError::Source` together with the identifier.
pub trait DocumentSource: Sync {
    /// full text of the document
    fn read_text(&self, id: &str) -> Result<String, BoxError>;

    /// pre-built cross-reference names of the document
    fn backrefs(&self, id: &str) -> Result<Vec<String>, BoxError> {
        Err(format!("no backreference index available for `{id}`").into())
    }
}

/// Any `Fn(&str) -> Result<String, BoxError>` works as a text source
impl<F> DocumentSource for F
where
    F: Fn(&str) -> Result<String, BoxError> + Sync,
{
    fn read_text(&self, id: &str) -> Result<String, BoxError> {
        self(id)
    }
}

/// Reads identifiers as file paths
/// relative identifiers are resolved against `root` when one is set
#[derive(Debug, Clone, Default)]
pub struct FsSource {
    root: Option<PathBuf>,
}

impl FsSource {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, id: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(id),
            None => Path::new(id).to_path_buf(),
        }
    }
}

impl DocumentSource for FsSource {
    fn read_text(&self, id: &str) -> Result<String, BoxError> {
        Ok(fs::read_to_string(self.resolve(id))?)
    }
}

/// In-memory texts and backreference lists keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    texts: IndexMap<String, String>,
    backrefs: IndexMap<String, Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text<K, T>(mut self, id: K, text: T) -> Self
    where
        K: Into<String>,
        T: Into<String>,
    {
        self.insert_text(id, text);
        self
    }

    pub fn with_backrefs<K, I, S>(mut self, id: K, names: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backrefs
            .insert(id.into(), names.into_iter().map(Into::into).collect());
        self
    }

    pub fn insert_text<K, T>(&mut self, id: K, text: T) -> Option<String>
    where
        K: Into<String>,
        T: Into<String>,
    {
        self.texts.insert(id.into(), text.into())
    }

    /// identifiers that have text, in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.texts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl<K, T> FromIterator<(K, T)> for MemorySource
where
    K: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (id, text) in iter {
            source.insert_text(id, text);
        }
        source
    }
}

impl DocumentSource for MemorySource {
    fn read_text(&self, id: &str) -> Result<String, BoxError> {
        self.texts
            .get(id)
            .cloned()
            .ok_or_else(|| format!("no text for `{id}`").into())
    }

    fn backrefs(&self, id: &str) -> Result<Vec<String>, BoxError> {
        self.backrefs
            .get(id)
            .cloned()
            .ok_or_else(|| format!("no backreferences for `{id}`").into())
    }
}
