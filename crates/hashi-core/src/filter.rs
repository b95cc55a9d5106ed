//! Restricts raw translation pairs to those both spaces can resolve.

use tracing::debug;

use crate::space::EmbeddingSpace;
use crate::types::BilingualPair;

/// Intersects bilingual pairs with a source and a target vocabulary.
pub struct PairFilter<'a> {
    source: &'a dyn EmbeddingSpace,
    target: &'a dyn EmbeddingSpace,
}

impl<'a> PairFilter<'a> {
    pub fn new(source: &'a dyn EmbeddingSpace, target: &'a dyn EmbeddingSpace) -> Self {
        Self { source, target }
    }

    /// Keeps every pair whose source word is in the source space and whose
    /// target word is in the target space.
    ///
    /// Survivors stay in input order and duplicates are kept, so row `i` of
    /// the training matrices built from the output always refers to the same
    /// pair. An empty output is valid here; training rejects it later.
    pub fn filter<I>(&self, pairs: I) -> Vec<BilingualPair>
    where
        I: IntoIterator<Item = BilingualPair>,
    {
        let mut total = 0usize;
        let kept: Vec<BilingualPair> = pairs
            .into_iter()
            .inspect(|_| total += 1)
            .filter(|pair| self.source.contains(&pair.source) && self.target.contains(&pair.target))
            .collect();

        debug!(
            "Kept {} of {} bilingual pairs ({} dropped as out of vocabulary)",
            kept.len(),
            total,
            total - kept.len()
        );

        kept
    }
}
