//! Brute-force top-K search of a target space for a mapped query vector.

use std::cmp::Ordering;

use candle_core::{Device, Tensor};
use hashi_core::{
    Candidate, EmbeddingSpace, HashiError, MappingMatrix, Result, SimilarityResult,
};
use tracing::debug;

/// Number of candidates returned when the caller does not ask for a cutoff.
pub const DEFAULT_CUTOFF: usize = 10;

/// Ranks target-language words for source-language queries through a
/// trained mapping.
///
/// Scores are dot products between the mapped query `z' = W · v` and the
/// unit-normalized target vectors, i.e. cosine similarity scaled by `|z'|`.
/// Every query scans the whole target vocabulary.
pub struct SimilarityRanker<'a> {
    source: &'a dyn EmbeddingSpace,
    target: &'a dyn EmbeddingSpace,
    mapping: &'a MappingMatrix,
}

impl<'a> SimilarityRanker<'a> {
    /// # Errors
    /// [`HashiError::Dimension`] if `mapping` does not go from the source
    /// space's dimension to the target space's.
    pub fn new(
        source: &'a dyn EmbeddingSpace,
        target: &'a dyn EmbeddingSpace,
        mapping: &'a MappingMatrix,
    ) -> Result<Self> {
        if mapping.source_dim() != source.dimension() {
            return Err(HashiError::dimension(
                "mapping input width",
                source.dimension(),
                mapping.source_dim(),
            ));
        }
        if mapping.target_dim() != target.dimension() {
            return Err(HashiError::dimension(
                "mapping output height",
                target.dimension(),
                mapping.target_dim(),
            ));
        }
        Ok(Self {
            source,
            target,
            mapping,
        })
    }

    /// The `cutoff` target words most similar to the mapped vector of
    /// `token`, best first.
    ///
    /// A token the source space does not know yields an empty result.
    pub fn rank(&self, token: &str, cutoff: usize) -> Result<SimilarityResult> {
        match self.source.lookup(token) {
            Some(vector) => self.rank_source_vector(vector, cutoff),
            None => {
                debug!("{:?} is not in the source vocabulary", token);
                Ok(SimilarityResult::empty())
            }
        }
    }

    /// Maps a raw source-space vector and ranks the target space against it.
    pub fn rank_source_vector(&self, vector: &[f32], cutoff: usize) -> Result<SimilarityResult> {
        let projected = self.mapping.project(vector)?;
        self.rank_vector(&projected, cutoff)
    }

    /// Ranks the target space against a vector already in target
    /// coordinates.
    pub fn rank_vector(&self, query: &[f32], cutoff: usize) -> Result<SimilarityResult> {
        let dim = self.target.dimension();
        if query.len() != dim {
            return Err(HashiError::dimension("target query vector", dim, query.len()));
        }
        if cutoff == 0 || self.target.is_empty() {
            return Ok(SimilarityResult::empty());
        }

        let scores = similarity_scores(self.target, query)?;
        let top = top_k(&scores, cutoff, |i| self.target.word(i).unwrap_or_default());

        let candidates = top
            .into_iter()
            .map(|i| Candidate::new(self.target.word(i).unwrap_or_default(), scores[i]))
            .collect();
        Ok(SimilarityResult::new(candidates))
    }
}

/// Dot product of `query` with every unit-normalized vector of `space`, in
/// vocabulary order.
pub fn similarity_scores(space: &dyn EmbeddingSpace, query: &[f32]) -> Result<Vec<f32>> {
    let matrix = space.normalized_matrix();
    let (rows, cols) = matrix.dims2()?;
    if cols != query.len() {
        return Err(HashiError::dimension("normalized matrix width", query.len(), cols));
    }
    if rows != space.len() {
        return Err(HashiError::dimension("normalized matrix rows", space.len(), rows));
    }

    let column = Tensor::from_slice(query, (cols, 1), &Device::Cpu)?;
    let scores = matrix.matmul(&column)?.squeeze(1)?.to_vec1::<f32>()?;
    Ok(scores)
}

/// Indices of the `k` highest scores, best first. Equal scores are ordered
/// by ascending word so results do not depend on vocabulary order. NaN
/// scores rank below every number.
pub fn top_k<'w, F>(scores: &[f32], k: usize, word: F) -> Vec<usize>
where
    F: Fn(usize) -> &'w str,
{
    let key = |i: usize| {
        let s = scores[i];
        if s.is_nan() { f32::NEG_INFINITY } else { s }
    };
    let compare = |&a: &usize, &b: &usize| -> Ordering {
        key(b)
            .total_cmp(&key(a))
            .then_with(|| word(a).cmp(word(b)))
    };

    if k == 0 {
        return Vec::new();
    }
    let mut order: Vec<usize> = (0..scores.len()).collect();
    if k < order.len() {
        order.select_nth_unstable_by(k - 1, compare);
        order.truncate(k);
    }
    order.sort_unstable_by(compare);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashi_core::InMemorySpace;

    fn identity(dim: usize) -> MappingMatrix {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        MappingMatrix::from_vec(data, dim, dim).unwrap()
    }

    fn spaces() -> (InMemorySpace, InMemorySpace) {
        let en = InMemorySpace::new(
            2,
            vec![("mother", vec![1.0, 0.1]), ("father", vec![0.1, 1.0])],
        )
        .unwrap();
        let de = InMemorySpace::new(
            2,
            vec![
                ("Vater", vec![0.0, 5.0]),
                ("Mutter", vec![3.0, 0.0]),
                ("Kind", vec![1.0, 1.0]),
                ("Haus", vec![-1.0, -1.0]),
            ],
        )
        .unwrap();
        (en, de)
    }

    #[test]
    fn ranks_by_direction_not_length() {
        let (en, de) = spaces();
        let w = identity(2);
        let ranker = SimilarityRanker::new(&en, &de, &w).unwrap();
        let result = ranker.rank("mother", 10).unwrap();
        assert_eq!(result.words(), vec!["Mutter", "Kind", "Vater", "Haus"]);

        let result = ranker.rank("father", 1).unwrap();
        assert_eq!(result.words(), vec!["Vater"]);
    }

    #[test]
    fn scores_are_non_increasing_and_may_be_negative() {
        let (en, de) = spaces();
        let w = identity(2);
        let result = SimilarityRanker::new(&en, &de, &w)
            .unwrap()
            .rank("mother", 10)
            .unwrap();
        let scores: Vec<f32> = result.iter().map(|c| c.score).collect();
        assert!(scores.windows(2).all(|p| p[0] >= p[1]));
        assert!(scores[3] < 0.0);
        // mother = (1, 0.1) against unit Mutter = (1, 0)
        assert!((scores[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unknown_token_gives_empty_result() {
        let (en, de) = spaces();
        let w = identity(2);
        let ranker = SimilarityRanker::new(&en, &de, &w).unwrap();
        assert!(ranker.rank("Mother", 10).unwrap().is_empty());
    }

    #[test]
    fn cutoff_larger_than_vocabulary_returns_everything() {
        let (en, de) = spaces();
        let w = identity(2);
        let ranker = SimilarityRanker::new(&en, &de, &w).unwrap();
        assert_eq!(ranker.rank("father", 1000).unwrap().len(), de.len());
        assert!(ranker.rank("father", 0).unwrap().is_empty());
    }

    #[test]
    fn mapping_is_applied_before_search() {
        let (en, de) = spaces();
        // swaps the two coordinates, so "mother" lands on "Vater"
        let swap = MappingMatrix::from_rows(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 2).unwrap();
        let ranker = SimilarityRanker::new(&en, &de, &swap).unwrap();
        assert_eq!(
            ranker.rank("mother", 1).unwrap().best().map(|c| c.word.as_str()),
            Some("Vater")
        );
    }

    #[test]
    fn cross_dimension_mapping() {
        let en = InMemorySpace::new(3, vec![("one", vec![1.0, 2.0, 3.0])]).unwrap();
        let de = InMemorySpace::new(
            2,
            vec![("eins", vec![1.0, 1.0]), ("zwei", vec![1.0, -1.0])],
        )
        .unwrap();
        // W · (1, 2, 3) = (6, 6)
        let w = MappingMatrix::from_rows(vec![vec![1.0, 1.0, 1.0], vec![0.0, 0.0, 2.0]], 3)
            .unwrap();
        let result = SimilarityRanker::new(&en, &de, &w)
            .unwrap()
            .rank("one", 10)
            .unwrap();
        assert_eq!(result.words(), vec!["eins", "zwei"]);
        assert!((result.iter().next().unwrap().score - 12.0 / 2f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn rejects_mismatched_mapping() {
        let (en, de) = spaces();
        let w = identity(3);
        assert!(matches!(
            SimilarityRanker::new(&en, &de, &w),
            Err(HashiError::Dimension { .. })
        ));
    }

    #[test]
    fn rank_vector_checks_length() {
        let (en, de) = spaces();
        let w = identity(2);
        let ranker = SimilarityRanker::new(&en, &de, &w).unwrap();
        assert!(matches!(
            ranker.rank_vector(&[1.0, 0.0, 0.0], 3),
            Err(HashiError::Dimension { .. })
        ));
        assert!(matches!(
            ranker.rank_source_vector(&[1.0], 3),
            Err(HashiError::Dimension { .. })
        ));
    }

    #[test]
    fn ties_break_by_word() {
        let words = ["pear", "apple", "fig", "banana"];
        let scores = [0.5, 0.5, 0.9, 0.5];
        let order = top_k(&scores, 4, |i| words[i]);
        let ranked: Vec<&str> = order.iter().map(|&i| words[i]).collect();
        assert_eq!(ranked, vec!["fig", "apple", "banana", "pear"]);

        let order = top_k(&scores, 2, |i| words[i]);
        let ranked: Vec<&str> = order.iter().map(|&i| words[i]).collect();
        assert_eq!(ranked, vec!["fig", "apple"]);
    }

    #[test]
    fn nan_scores_sink_to_the_end() {
        let words = ["Bad", "Mutter", "Vater"];
        let scores = [f32::NAN, 1.0, -0.5];
        let order = top_k(&scores, 3, |i| words[i]);
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(top_k(&scores, 1, |i| words[i]), vec![1]);
    }

    #[test]
    fn top_k_partial_selection_matches_full_sort() {
        let mut rng = oorandom::Rand32::new(3);
        let scores: Vec<f32> = (0..500).map(|_| rng.rand_float()).collect();
        let names: Vec<String> = (0..500).map(|i| format!("w{i:03}")).collect();
        let full = top_k(&scores, scores.len(), |i| names[i].as_str());
        let partial = top_k(&scores, 25, |i| names[i].as_str());
        assert_eq!(&full[..25], &partial[..]);
    }

    #[test]
    fn empty_target_space() {
        let en = InMemorySpace::new(2, vec![("mother", vec![1.0, 0.0])]).unwrap();
        let de = InMemorySpace::new(2, Vec::<(String, Vec<f32>)>::new()).unwrap();
        let w = identity(2);
        let ranker = SimilarityRanker::new(&en, &de, &w).unwrap();
        assert!(ranker.rank("mother", 10).unwrap().is_empty());
    }
}
