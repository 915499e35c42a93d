use std::fmt::{self, Debug, Display};

/// One ranked neighbour
#[derive(Debug, Clone, PartialEq)]
pub struct HitEntry<K> {
    pub key: K,
    pub score: f64,
    /// position of the document in the fitted corpus
    pub position: usize,
}

/// Structure to store ranked neighbours
#[derive(Clone, PartialEq)]
pub struct Hits<K> {
    pub list: Vec<HitEntry<K>>,
}

impl<K> Hits<K> {
    pub fn new(list: Vec<HitEntry<K>>) -> Self {
        Hits { list }
    }

    /// Sort by descending score
    /// equal scores keep corpus order (ascending position)
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|e| !e.score.is_nan());
        self.list.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.position.cmp(&b.position))
        });
        self
    }

    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|e| &e.key)
    }

    pub fn into_keys(self) -> Vec<K> {
        self.list.into_iter().map(|e| e.key).collect()
    }
}

/// Top `n` positions of a similarity row, `exclude` left out
///
/// Score descending, ties by ascending position. The excluded position is
/// dropped by index, not by assuming it ranks first. Keys are positions.
pub fn rank_row(row: &[f64], exclude: usize, n: usize) -> Hits<usize> {
    let list = row
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != exclude)
        .map(|(j, &score)| HitEntry {
            key: j,
            score,
            position: j,
        })
        .collect();
    let mut hits = Hits::new(list);
    hits.sort_by_score_desc().truncate(n);
    hits
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for e in &self.list {
                writeln!(f, "    {:?}: {:.6} (pos: {})", e.key, e.score, e.position)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<K> Display for Hits<K>
where
    K: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, e) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {:.6}\t{}", rank + 1, e.score, e.key)?;
        }
        Ok(())
    }
}
