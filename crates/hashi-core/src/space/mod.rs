//! # Embedding Spaces
//!
//! The contract the mapping engine needs from a word-embedding index.
//! Loading indices from disk is left to callers; [`InMemorySpace`] holds
//! vectors they have already resolved.

pub mod memory;

use std::sync::Arc;

use candle_core::Tensor;

pub use memory::InMemorySpace;

/// A vocabulary of words, each with a fixed-length vector.
///
/// Indices run over `0..len()` and are stable for the lifetime of the space.
pub trait EmbeddingSpace: Send + Sync {
    /// Length of every vector in this space.
    fn dimension(&self) -> usize;

    /// Number of words in the vocabulary.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vocabulary index of `word`.
    fn index_of(&self, word: &str) -> Option<usize>;

    fn word(&self, index: usize) -> Option<&str>;

    fn vector(&self, index: usize) -> Option<&[f32]>;

    /// Vector for `word`, or `None` when the word is out of vocabulary.
    fn lookup(&self, word: &str) -> Option<&[f32]> {
        self.index_of(word).and_then(|index| self.vector(index))
    }

    fn contains(&self, word: &str) -> bool {
        self.index_of(word).is_some()
    }

    /// All `(word, vector)` pairs in index order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &[f32])> + '_> {
        Box::new((0..self.len()).filter_map(move |i| Some((self.word(i)?, self.vector(i)?))))
    }

    /// Every vector scaled to unit length, as a `(len, dimension)` matrix
    /// whose row `i` belongs to `word(i)`. Zero vectors stay zero.
    ///
    /// Implementations build this once and hand out the same tensor on
    /// every call.
    fn normalized_matrix(&self) -> &Tensor;
}

impl<S: EmbeddingSpace + ?Sized> EmbeddingSpace for Arc<S> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn index_of(&self, word: &str) -> Option<usize> {
        (**self).index_of(word)
    }

    fn word(&self, index: usize) -> Option<&str> {
        (**self).word(index)
    }

    fn vector(&self, index: usize) -> Option<&[f32]> {
        (**self).vector(index)
    }

    fn normalized_matrix(&self) -> &Tensor {
        (**self).normalized_matrix()
    }
}

/// Scales `vector` to unit L2 norm in place. A zero vector is left as is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
