//! Fits the mapping matrix one target dimension at a time.

use hashi_core::{BilingualPair, EmbeddingSpace, HashiError, MappingMatrix, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::TrainingMatrices;
use crate::sgd::{SgdConfig, SgdFit, SgdRegressor};

/// Configuration for [`MappingTrainer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Settings shared by every per-dimension regression.
    pub sgd: SgdConfig,
    /// Fit target dimensions on the rayon thread pool.
    pub parallel: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            sgd: SgdConfig::default(),
            parallel: true,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sgd(mut self, sgd: SgdConfig) -> Self {
        self.sgd = sgd;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Number of bilingual pairs used, `N`.
    pub pairs: usize,
    pub source_dim: usize,
    pub target_dim: usize,
    /// Final epoch loss averaged over target dimensions.
    pub mean_loss: f64,
    /// Final epoch loss of the worst-fitting target dimension.
    pub max_loss: f64,
    /// Epochs run, averaged over target dimensions.
    pub mean_epochs: f64,
}

/// A mapping matrix together with the report of the run that produced it.
#[derive(Debug, Clone)]
pub struct TrainedMapping {
    pub matrix: MappingMatrix,
    pub report: TrainingReport,
}

/// Learns `W (target_dim × source_dim)` such that `W · source ≈ target` over
/// a set of translation pairs.
///
/// Each target coordinate is an independent least-squares problem over the
/// same source features, so each row of `W` comes from its own
/// [`SgdRegressor`] fit. Rows are assembled in dimension order whether or
/// not the fits run in parallel.
#[derive(Debug, Clone, Default)]
pub struct MappingTrainer {
    config: TrainerConfig,
}

impl MappingTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Trains a mapping from `pairs`, which must already be filtered to words
    /// both spaces know.
    ///
    /// # Errors
    /// - [`HashiError::Data`] if `pairs` is empty, the SGD settings are out
    ///   of range, or a regression diverges.
    /// - [`HashiError::Dimension`] if the spaces hand out vectors that do not
    ///   match their declared dimensions.
    pub fn train(
        &self,
        pairs: &[BilingualPair],
        source: &dyn EmbeddingSpace,
        target: &dyn EmbeddingSpace,
    ) -> Result<TrainedMapping> {
        self.config.sgd.validate()?;
        let data = TrainingMatrices::build(pairs, source, target)?;
        let (n, source_dim, target_dim) = (data.rows(), data.source_dim(), data.target_dim());

        if n == 1 {
            warn!("Training on a single bilingual pair; the mapping will be unreliable");
        } else if n < source_dim {
            warn!(
                "Training on {} pairs for {} source dimensions; the system is underdetermined",
                n, source_dim
            );
        }

        info!(
            "Fitting {}x{} mapping from {} bilingual pairs{}",
            target_dim,
            source_dim,
            n,
            if self.config.parallel { " (parallel)" } else { "" }
        );

        let regressor = SgdRegressor::new(self.config.sgd.clone());
        let base_seed = self.config.sgd.seed;
        let fit_dimension = |j: usize| -> Result<SgdFit> {
            let column = data.target_column(j);
            let fit = regressor.fit(data.x(), source_dim, &column, dimension_seed(base_seed, j))?;
            debug!(
                "Target dimension {}: {} epochs, loss {:.6}",
                j, fit.epochs, fit.loss
            );
            Ok(fit)
        };

        let fits: Vec<SgdFit> = if self.config.parallel {
            (0..target_dim)
                .into_par_iter()
                .map(fit_dimension)
                .collect::<Result<_>>()?
        } else {
            (0..target_dim).map(fit_dimension).collect::<Result<_>>()?
        };

        let report = summarize(&fits, n, source_dim, target_dim);
        let rows = fits.into_iter().map(|fit| fit.coef).collect();
        let matrix = MappingMatrix::from_rows(rows, source_dim)?;

        if matrix.shape() != (target_dim, source_dim) {
            let (rows, cols) = matrix.shape();
            return Err(HashiError::dimension(
                "mapping matrix",
                target_dim * source_dim,
                rows * cols,
            ));
        }

        info!(
            "Mapping trained: mean loss {:.6}, worst loss {:.6}, {:.1} epochs on average",
            report.mean_loss, report.max_loss, report.mean_epochs
        );

        Ok(TrainedMapping { matrix, report })
    }
}

/// Seed for the regression of target dimension `j`: distinct per dimension,
/// fixed for a given base seed.
fn dimension_seed(base: u64, j: usize) -> u64 {
    base.wrapping_add((j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn summarize(fits: &[SgdFit], pairs: usize, source_dim: usize, target_dim: usize) -> TrainingReport {
    let count = fits.len().max(1) as f64;
    TrainingReport {
        pairs,
        source_dim,
        target_dim,
        mean_loss: fits.iter().map(|f| f.loss).sum::<f64>() / count,
        max_loss: fits.iter().map(|f| f.loss).fold(0.0, f64::max),
        mean_epochs: fits.iter().map(|f| f.epochs as f64).sum::<f64>() / count,
    }
}
