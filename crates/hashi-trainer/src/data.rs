//! Paired training matrices built from filtered bilingual pairs.

use hashi_core::{BilingualPair, EmbeddingSpace, HashiError, Result};

/// Row-aligned source and target matrices: row `i` of `x` and row `i` of `z`
/// are the two sides of the same bilingual pair.
#[derive(Debug, Clone)]
pub struct TrainingMatrices {
    x: Vec<f32>,
    z: Vec<f32>,
    rows: usize,
    source_dim: usize,
    target_dim: usize,
}

impl TrainingMatrices {
    /// Stacks the source vector of every pair into `X (N × source_dim)` and
    /// the target vector into `Z (N × target_dim)`.
    ///
    /// # Errors
    /// - [`HashiError::Data`] if `pairs` is empty or a word is missing from
    ///   its space.
    /// - [`HashiError::Dimension`] if either space has dimension zero, a
    ///   vector's length disagrees with its space, or the two matrices end up with different row counts.
    pub fn build(
        pairs: &[BilingualPair],
        source: &dyn EmbeddingSpace,
        target: &dyn EmbeddingSpace,
    ) -> Result<Self> {
        if source.dimension() == 0 {
            return Err(HashiError::dimension("source embedding dimension", 1, 0));
        }
        if target.dimension() == 0 {
            return Err(HashiError::dimension("target embedding dimension", 1, 0));
        }
        if pairs.is_empty() {
            return Err(HashiError::Data(
                "no bilingual pairs are present in both embedding spaces".into(),
            ));
        }

        let source_dim = source.dimension();
        let target_dim = target.dimension();
        let mut x = Vec::with_capacity(pairs.len() * source_dim);
        let mut z = Vec::with_capacity(pairs.len() * target_dim);

        for pair in pairs {
            let src = resolve(source, &pair.source, "source")?;
            let tgt = resolve(target, &pair.target, "target")?;
            x.extend_from_slice(src);
            z.extend_from_slice(tgt);
        }

        let x_rows = x.len() / source_dim;
        let z_rows = z.len() / target_dim;
        if x_rows != z_rows {
            return Err(HashiError::dimension("training matrix rows", x_rows, z_rows));
        }

        Ok(Self {
            x,
            z,
            rows: x_rows,
            source_dim,
            target_dim,
        })
    }

    /// Number of training pairs, `N`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn source_dim(&self) -> usize {
        self.source_dim
    }

    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    /// `X` in row-major order.
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Column `j` of `Z`: every pair's value for target coordinate `j`.
    pub fn target_column(&self, j: usize) -> Vec<f32> {
        self.z
            .chunks_exact(self.target_dim)
            .map(|row| row[j])
            .collect()
    }
}

fn resolve<'a>(space: &'a dyn EmbeddingSpace, word: &str, side: &str) -> Result<&'a [f32]> {
    let vector = space.lookup(word).ok_or_else(|| {
        HashiError::Data(format!("{side} word {word:?} is not in its embedding space"))
    })?;
    if vector.len() != space.dimension() {
        return Err(HashiError::dimension(
            format!("{side} vector for {word:?}"),
            space.dimension(),
            vector.len(),
        ));
    }
    Ok(vector)
}
