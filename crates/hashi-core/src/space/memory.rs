use std::collections::HashMap;

use candle_core::{Device, Tensor};
use tracing::debug;

use super::{l2_normalize, EmbeddingSpace};
use crate::error::{HashiError, Result};

/// An embedding space held entirely in memory.
///
/// Vectors live in one row-major buffer. The unit-normalized copy used for
/// similarity search is computed once at construction.
#[derive(Debug, Clone)]
pub struct InMemorySpace {
    dimension: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<f32>,
    normalized: Tensor,
}

impl InMemorySpace {
    /// Builds a space from `(word, vector)` entries.
    ///
    /// When a word repeats, its first vector wins and later ones are skipped.
    ///
    /// # Errors
    /// - [`HashiError::Dimension`] if `dimension` is zero or a vector has the
    ///   wrong length.
    /// - [`HashiError::Data`] if a word is empty or a vector holds NaN or
    ///   an infinity.
    pub fn new<I, W>(dimension: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (W, Vec<f32>)>,
        W: Into<String>,
    {
        if dimension == 0 {
            return Err(HashiError::dimension("embedding space dimension", 1, 0));
        }

        let mut words = Vec::new();
        let mut index = HashMap::new();
        let mut vectors = Vec::new();
        let mut skipped = 0usize;

        for (word, vector) in entries {
            let word = word.into();
            if word.is_empty() {
                return Err(HashiError::Data("embedding space contains an empty word".into()));
            }
            if vector.len() != dimension {
                return Err(HashiError::dimension(
                    format!("vector for {word:?}"),
                    dimension,
                    vector.len(),
                ));
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(HashiError::Data(format!(
                    "vector for {word:?} has a non-finite component"
                )));
            }
            if index.contains_key(&word) {
                skipped += 1;
                continue;
            }
            index.insert(word.clone(), words.len());
            words.push(word);
            vectors.extend(vector);
        }

        if skipped > 0 {
            debug!("Skipped {} duplicate words while building embedding space", skipped);
        }

        let mut unit = vectors.clone();
        for row in unit.chunks_mut(dimension) {
            l2_normalize(row);
        }
        let normalized = Tensor::from_vec(unit, (words.len(), dimension), &Device::Cpu)?;

        Ok(Self {
            dimension,
            words,
            index,
            vectors,
            normalized,
        })
    }

    /// Vocabulary in index order.
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl EmbeddingSpace for InMemorySpace {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn index_of(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    fn vector(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.vectors.get(start..end)
    }

    fn normalized_matrix(&self) -> &Tensor {
        &self.normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> InMemorySpace {
        InMemorySpace::new(
            3,
            vec![
                ("mother", vec![1.0, 2.0, 2.0]),
                ("father", vec![0.0, 3.0, 4.0]),
                ("zero", vec![0.0, 0.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn lookup_by_word_and_index() {
        let space = space();
        assert_eq!(space.dimension(), 3);
        assert_eq!(space.len(), 3);
        assert_eq!(space.index_of("father"), Some(1));
        assert_eq!(space.word(0), Some("mother"));
        assert_eq!(space.lookup("father"), Some(&[0.0, 3.0, 4.0][..]));
        assert_eq!(space.lookup("Mutter"), None);
        assert_eq!(space.vector(3), None);
        assert_eq!(space.word(3), None);
        assert_eq!(space.vector(usize::MAX / 3), None);
    }

    #[test]
    fn normalized_rows_are_unit_length() {
        let rows = space().normalized_matrix().to_vec2::<f32>().unwrap();
        assert_eq!(rows.len(), 3);
        let norm = |r: &[f32]| r.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm(&rows[0]) - 1.0).abs() < 1e-6);
        assert!((rows[1][2] - 0.8).abs() < 1e-6);
        assert_eq!(rows[2], vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn raw_vectors_are_not_normalized() {
        assert_eq!(space().lookup("mother"), Some(&[1.0, 2.0, 2.0][..]));
    }

    #[test]
    fn first_duplicate_wins() {
        let space =
            InMemorySpace::new(1, vec![("a", vec![1.0]), ("a", vec![2.0]), ("b", vec![3.0])])
                .unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.lookup("a"), Some(&[1.0][..]));
        assert_eq!(space.words(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn rejects_ragged_vectors() {
        let err = InMemorySpace::new(2, vec![("a", vec![1.0, 0.0]), ("b", vec![1.0])]).unwrap_err();
        assert!(matches!(
            err,
            HashiError::Dimension {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_dimension() {
        let entries: Vec<(String, Vec<f32>)> = Vec::new();
        assert!(matches!(
            InMemorySpace::new(0, entries),
            Err(HashiError::Dimension { .. })
        ));
    }

    #[test]
    fn rejects_empty_word() {
        assert!(matches!(
            InMemorySpace::new(1, vec![("", vec![1.0])]),
            Err(HashiError::Data(_))
        ));
    }

    #[test]
    fn empty_space_is_allowed() {
        let entries: Vec<(String, Vec<f32>)> = Vec::new();
        let space = InMemorySpace::new(4, entries).unwrap();
        assert!(space.is_empty());
        assert_eq!(space.entries().count(), 0);
    }

    #[test]
    fn rejects_non_finite_components() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result =
                InMemorySpace::new(2, vec![("Mutter", vec![1.0, 0.0]), ("Bad", vec![bad, 0.0])]);
            assert!(matches!(result, Err(HashiError::Data(ref m)) if m.contains("Bad")));
        }
    }
}
