//! Stochastic gradient descent for single-output linear regression.
//!
//! Minimizes `½(w·x + b - y)² + ½·alpha·|w|²` one sample at a time, the
//! same objective scikit-learn's `SGDRegressor` uses with its defaults.

use hashi_core::{HashiError, Result};
use serde::{Deserialize, Serialize};

/// Step-size schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningRate {
    /// `eta = eta0` for every update.
    Constant,
    /// `eta = eta0 / t^power_t`, where `t` counts updates from 1.
    InvScaling { power_t: f64 },
}

impl LearningRate {
    fn eta(self, eta0: f64, t: u64) -> f64 {
        match self {
            Self::Constant => eta0,
            Self::InvScaling { power_t } => eta0 / (t as f64).powf(power_t),
        }
    }
}

impl Default for LearningRate {
    fn default() -> Self {
        Self::InvScaling { power_t: 0.25 }
    }
}

/// Hyperparameters for [`SgdRegressor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    /// L2 penalty strength.
    pub alpha: f64,
    /// Initial learning rate.
    pub eta0: f64,
    pub learning_rate: LearningRate,
    /// Upper bound on passes over the data.
    pub max_epochs: usize,
    /// Minimum drop in epoch loss that counts as progress.
    pub tol: f64,
    /// Consecutive epochs without progress before stopping.
    pub n_iter_no_change: usize,
    /// Learn a bias term. It is used during fitting only and never becomes
    /// part of the coefficient vector.
    pub fit_intercept: bool,
    /// Visit samples in a fresh random order each epoch.
    pub shuffle: bool,
    /// Base seed for the shuffling generator.
    pub seed: u64,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            eta0: 0.01,
            learning_rate: LearningRate::default(),
            max_epochs: 1000,
            tol: 1e-3,
            n_iter_no_change: 5,
            fit_intercept: false,
            shuffle: true,
            seed: 42,
        }
    }
}

impl SgdConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha.max(0.0);
        self
    }

    pub fn with_eta0(mut self, eta0: f64) -> Self {
        self.eta0 = eta0.max(f64::MIN_POSITIVE);
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: LearningRate) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs.max(1);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol.max(0.0);
        self
    }

    pub fn with_n_iter_no_change(mut self, n: usize) -> Self {
        self.n_iter_no_change = n.max(1);
        self
    }

    pub fn with_intercept(mut self, enabled: bool) -> Self {
        self.fit_intercept = enabled;
        self
    }

    pub fn with_shuffle(mut self, enabled: bool) -> Self {
        self.shuffle = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks values that bypassed the builders, e.g. loaded from JSON.
    ///
    /// # Errors
    /// [`HashiError::Data`] naming the first field that is out of range.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, value: String| {
            Err(HashiError::Data(format!("invalid SGD setting {field} = {value}")))
        };
        if !(self.eta0.is_finite() && self.eta0 > 0.0) {
            return invalid("eta0", self.eta0.to_string());
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return invalid("alpha", self.alpha.to_string());
        }
        if !(self.tol.is_finite() && self.tol >= 0.0) {
            return invalid("tol", self.tol.to_string());
        }
        if self.max_epochs == 0 {
            return invalid("max_epochs", "0".into());
        }
        if self.n_iter_no_change == 0 {
            return invalid("n_iter_no_change", "0".into());
        }
        if let LearningRate::InvScaling { power_t } = self.learning_rate {
            if !(power_t.is_finite() && power_t >= 0.0) {
                return invalid("power_t", power_t.to_string());
            }
        }
        Ok(())
    }
}

/// Outcome of one regression.
#[derive(Debug, Clone, PartialEq)]
pub struct SgdFit {
    /// One coefficient per input feature.
    pub coef: Vec<f32>,
    /// Learned bias, `0.0` unless the intercept is enabled.
    pub intercept: f32,
    /// Epochs actually run.
    pub epochs: usize,
    /// Mean squared-error loss (halved) over the last epoch.
    pub loss: f64,
}

/// Linear regressor trained by plain per-sample SGD.
#[derive(Debug, Clone, Default)]
pub struct SgdRegressor {
    config: SgdConfig,
}

impl SgdRegressor {
    pub fn new(config: SgdConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SgdConfig {
        &self.config
    }

    /// Fits `y ≈ X·w (+ b)`.
    ///
    /// `x` is row-major with `n_features` columns and one row per entry of
    /// `y`. `seed` drives the sample order; equal seeds give equal fits.
    ///
    /// # Errors
    /// - [`HashiError::Data`] on empty input, an invalid configuration, or
    ///   a non-finite epoch loss.
    /// - [`HashiError::Dimension`] if `x` does not hold `y.len()` rows of
    ///   `n_features` values.
    pub fn fit(&self, x: &[f32], n_features: usize, y: &[f32], seed: u64) -> Result<SgdFit> {
        let n_samples = y.len();
        if n_samples == 0 {
            return Err(HashiError::Data("cannot fit a regression on zero samples".into()));
        }
        if n_features == 0 {
            return Err(HashiError::dimension("regression features", 1, 0));
        }
        self.config.validate()?;
        if x.len() != n_samples * n_features {
            return Err(HashiError::dimension(
                "regression design matrix",
                n_samples * n_features,
                x.len(),
            ));
        }

        let cfg = &self.config;
        let mut rng = oorandom::Rand64::new(u128::from(seed));
        let mut order: Vec<usize> = (0..n_samples).collect();

        let mut w = vec![0.0f64; n_features];
        let mut b = 0.0f64;
        let mut t: u64 = 1;

        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0usize;
        let mut epochs = 0usize;
        let mut loss = f64::INFINITY;

        for epoch in 0..cfg.max_epochs {
            if cfg.shuffle {
                for i in (1..order.len()).rev() {
                    let j = rng.rand_range(0..(i as u64 + 1)) as usize;
                    order.swap(i, j);
                }
            }

            let mut sum_loss = 0.0f64;
            for &i in &order {
                let row = &x[i * n_features..(i + 1) * n_features];
                let prediction = w
                    .iter()
                    .zip(row)
                    .map(|(wk, &xk)| wk * f64::from(xk))
                    .sum::<f64>()
                    + b;
                let err = prediction - f64::from(y[i]);
                sum_loss += 0.5 * err * err;

                let eta = cfg.learning_rate.eta(cfg.eta0, t);
                let decay = (1.0 - eta * cfg.alpha).max(0.0);
                let step = eta * err;
                for (wk, &xk) in w.iter_mut().zip(row) {
                    *wk = *wk * decay - step * f64::from(xk);
                }
                if cfg.fit_intercept {
                    b -= step;
                }
                t += 1;
            }

            epochs = epoch + 1;
            loss = sum_loss / n_samples as f64;
            if !loss.is_finite() {
                return Err(HashiError::Data(format!(
                    "regression diverged at epoch {epochs}; lower the learning rate"
                )));
            }

            if loss > best_loss - cfg.tol {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            best_loss = best_loss.min(loss);

            if no_improvement >= cfg.n_iter_no_change {
                break;
            }
        }

        Ok(SgdFit {
            coef: w.into_iter().map(|v| v as f32).collect(),
            intercept: b as f32,
            epochs,
            loss,
        })
    }
}
