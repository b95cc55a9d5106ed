//! # Bilingual Mapper
//!
//! Ties two embedding spaces, their shared translation pairs and a trained
//! mapping together behind one API with an explicit untrained/trained
//! lifecycle.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use hashi_core::{
    BilingualPair, EmbeddingSpace, HashiError, LanguagePair, MappingMatrix, PairFilter, Result,
    SimilarityResult,
};
use hashi_trainer::{MappingTrainer, TrainedMapping, TrainerConfig, TrainingReport};
use hashi_vecdb::{SimilarityRanker, DEFAULT_CUTOFF};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for [`BilingualMapper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// How the mapping is fitted.
    pub trainer: TrainerConfig,
    /// Cutoff used by [`BilingualMapper::most_similar_default`].
    pub default_cutoff: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            trainer: TrainerConfig::default(),
            default_cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl MapperConfig {
    /// Create a new mapper configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trainer configuration.
    pub fn with_trainer(mut self, trainer: TrainerConfig) -> Self {
        self.trainer = trainer;
        self
    }

    /// Set the default number of candidates returned per query (at least 1).
    pub fn with_default_cutoff(mut self, cutoff: usize) -> Self {
        self.default_cutoff = cutoff.max(1);
        self
    }
}

/// Where the mapper is in its lifecycle.
#[derive(Debug, Clone, Default)]
enum MappingState {
    #[default]
    Untrained,
    Trained(Arc<TrainedMapping>),
}

/// Learns a linear map from a source embedding space into a target
/// embedding space and uses it to propose translations.
///
/// Construction filters the translation pairs down to words both spaces
/// know. [`train`](Self::train) fits the mapping; until it succeeds every
/// query fails with [`HashiError::NotTrained`]. Retraining replaces the
/// mapping as a whole, and a failed run leaves the previous mapping in
/// place. The mapper can be shared across threads: queries run
/// concurrently and never see a half-built mapping.
///
/// # Examples
///
/// ```
/// use hashi::{BilingualMapper, BilingualPair, InMemorySpace, LanguagePair, MapperConfig};
///
/// let en = InMemorySpace::new(2, vec![
///     ("mother", vec![1.0, 0.0]),
///     ("father", vec![0.0, 1.0]),
/// ]).unwrap();
/// let de = InMemorySpace::new(2, vec![
///     ("Mutter", vec![0.0, 1.0]),
///     ("Vater", vec![1.0, 0.0]),
/// ]).unwrap();
/// let pairs = vec![
///     BilingualPair::new("mother", "Mutter"),
///     BilingualPair::new("father", "Vater"),
/// ];
///
/// let mapper = BilingualMapper::new(
///     LanguagePair::new("en", "de"),
///     en,
///     de,
///     pairs,
///     MapperConfig::default(),
/// ).unwrap();
///
/// assert!(mapper.most_similar("mother", 1).is_err());
///
/// mapper.train().unwrap();
/// assert_eq!(mapper.mapping().unwrap().shape(), (2, 2));
/// ```
pub struct BilingualMapper<S, T> {
    languages: LanguagePair,
    source: S,
    target: T,
    pairs: Vec<BilingualPair>,
    config: MapperConfig,
    trainer: MappingTrainer,
    state: RwLock<MappingState>,
    training: Mutex<()>,
}

impl<S, T> BilingualMapper<S, T>
where
    S: EmbeddingSpace,
    T: EmbeddingSpace,
{
    /// Creates an untrained mapper, keeping only the pairs whose source word
    /// is in `source` and whose target word is in `target`.
    ///
    /// A `default_cutoff` of zero, e.g. from a JSON config, is raised to 1.
    ///
    /// # Errors
    /// - [`HashiError::Dimension`] if either space has dimension zero.
    /// - [`HashiError::Data`] if the SGD settings are out of range.
    pub fn new<I>(
        languages: LanguagePair,
        source: S,
        target: T,
        raw_pairs: I,
        mut config: MapperConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = BilingualPair>,
    {
        if source.dimension() == 0 {
            return Err(HashiError::dimension(
                format!("{} embedding dimension", languages.source),
                1,
                0,
            ));
        }
        if target.dimension() == 0 {
            return Err(HashiError::dimension(
                format!("{} embedding dimension", languages.target),
                1,
                0,
            ));
        }

        config.trainer.sgd.validate()?;
        config.default_cutoff = config.default_cutoff.max(1);

        let pairs = PairFilter::new(&source, &target).filter(raw_pairs);
        info!(
            "{} mapper: {} usable pairs, {} -> {} dimensions, {} target words",
            languages,
            pairs.len(),
            source.dimension(),
            target.dimension(),
            target.len()
        );

        let trainer = MappingTrainer::new(config.trainer.clone());
        Ok(Self {
            languages,
            source,
            target,
            pairs,
            config,
            trainer,
            state: RwLock::new(MappingState::Untrained),
            training: Mutex::new(()),
        })
    }

    /// Fits the mapping on the current pairs and installs it.
    ///
    /// Concurrent calls run one at a time. Queries issued meanwhile keep
    /// using the previous mapping (or keep failing with
    /// [`HashiError::NotTrained`]) until the new one is complete.
    ///
    /// # Errors
    /// - [`HashiError::Data`] if no pairs survived filtering or a regression
    ///   diverged.
    /// - [`HashiError::Dimension`] on vector-length inconsistencies.
    ///
    /// On error the previous mapping, if any, is untouched.
    pub fn train(&self) -> Result<()> {
        let _serialized = self.training.lock().unwrap_or_else(PoisonError::into_inner);

        let trained = self.trainer.train(&self.pairs, &self.source, &self.target)?;
        debug!("{} mapping trained: {:?}", self.languages, trained.report);

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = MappingState::Trained(Arc::new(trained));
        Ok(())
    }

    /// Re-filters a new list of translation pairs, replacing the current
    /// ones. The installed mapping is kept until the next
    /// [`train`](Self::train). Returns the number of usable pairs.
    pub fn replace_pairs<I>(&mut self, raw_pairs: I) -> usize
    where
        I: IntoIterator<Item = BilingualPair>,
    {
        self.pairs = PairFilter::new(&self.source, &self.target).filter(raw_pairs);
        self.pairs.len()
    }

    /// The `cutoff` target words most similar to the mapped vector of
    /// `token`, best first.
    ///
    /// Returns an empty result when `token` is not in the source space.
    ///
    /// # Errors
    /// [`HashiError::NotTrained`] before the first successful training.
    pub fn most_similar(&self, token: &str, cutoff: usize) -> Result<SimilarityResult> {
        let trained = self.trained()?;
        SimilarityRanker::new(&self.source, &self.target, &trained.matrix)?.rank(token, cutoff)
    }

    /// [`most_similar`](Self::most_similar) with the configured default
    /// cutoff.
    pub fn most_similar_default(&self, token: &str) -> Result<SimilarityResult> {
        self.most_similar(token, self.config.default_cutoff)
    }

    /// Ranks the target space against a raw source-space vector, for
    /// queries that have no entry in the source vocabulary.
    pub fn most_similar_to_vector(
        &self,
        vector: &[f32],
        cutoff: usize,
    ) -> Result<SimilarityResult> {
        let trained = self.trained()?;
        SimilarityRanker::new(&self.source, &self.target, &trained.matrix)?
            .rank_source_vector(vector, cutoff)
    }

    pub fn is_trained(&self) -> bool {
        matches!(*self.read_state(), MappingState::Trained(_))
    }

    /// The installed mapping, `(target_dim, source_dim)`.
    pub fn mapping(&self) -> Result<MappingMatrix> {
        Ok(self.trained()?.matrix.clone())
    }

    /// Report of the run that produced the installed mapping.
    pub fn training_report(&self) -> Result<TrainingReport> {
        Ok(self.trained()?.report.clone())
    }

    /// Translation pairs usable for training, in input order.
    pub fn pairs(&self) -> &[BilingualPair] {
        &self.pairs
    }

    pub fn languages(&self) -> &LanguagePair {
        &self.languages
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    fn trained(&self) -> Result<Arc<TrainedMapping>> {
        match &*self.read_state() {
            MappingState::Trained(trained) => Ok(Arc::clone(trained)),
            MappingState::Untrained => Err(HashiError::NotTrained),
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, MappingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
