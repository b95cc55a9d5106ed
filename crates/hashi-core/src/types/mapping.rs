use candle_core::{Device, Tensor};

use crate::error::{HashiError, Result};

/// The learned linear map `W` from source-space vectors to target-space
/// vectors, shaped `(target_dim, source_dim)`.
///
/// Row `j` holds the coefficients that predict target coordinate `j`.
/// Cloning is cheap: the underlying tensor storage is shared.
#[derive(Debug, Clone)]
pub struct MappingMatrix {
    weights: Tensor,
    target_dim: usize,
    source_dim: usize,
}

impl MappingMatrix {
    /// Builds a matrix from row-major coefficients.
    pub fn from_vec(data: Vec<f32>, target_dim: usize, source_dim: usize) -> Result<Self> {
        let expected = target_dim * source_dim;
        if data.len() != expected {
            return Err(HashiError::dimension(
                "mapping coefficients",
                expected,
                data.len(),
            ));
        }
        let weights = Tensor::from_vec(data, (target_dim, source_dim), &Device::Cpu)?;
        Ok(Self {
            weights,
            target_dim,
            source_dim,
        })
    }

    /// Builds a matrix from one coefficient row per target dimension.
    pub fn from_rows(rows: Vec<Vec<f32>>, source_dim: usize) -> Result<Self> {
        let target_dim = rows.len();
        let mut data = Vec::with_capacity(target_dim * source_dim);
        for (j, row) in rows.into_iter().enumerate() {
            if row.len() != source_dim {
                return Err(HashiError::dimension(
                    format!("coefficient row {j}"),
                    source_dim,
                    row.len(),
                ));
            }
            data.extend(row);
        }
        Self::from_vec(data, target_dim, source_dim)
    }

    /// `(target_dim, source_dim)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.target_dim, self.source_dim)
    }

    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    pub fn source_dim(&self) -> usize {
        self.source_dim
    }

    pub fn as_tensor(&self) -> &Tensor {
        &self.weights
    }

    /// Maps a source-space vector into the target space: `W · v`.
    pub fn project(&self, vector: &[f32]) -> Result<Vec<f32>> {
        if vector.len() != self.source_dim {
            return Err(HashiError::dimension(
                "source vector",
                self.source_dim,
                vector.len(),
            ));
        }
        let column = Tensor::from_slice(vector, (self.source_dim, 1), &Device::Cpu)?;
        let projected = self.weights.matmul(&column)?.squeeze(1)?.to_vec1::<f32>()?;
        Ok(projected)
    }

    /// Coefficients as nested rows.
    pub fn to_rows(&self) -> Result<Vec<Vec<f32>>> {
        Ok(self.weights.to_vec2::<f32>()?)
    }
}
