//! # Hashi
//!
//! Learns a linear map between two word-embedding spaces from a handful of
//! known translations, then proposes translations for other words by
//! nearest-neighbor search in the target space.
//!
//! The pipeline has three stages, each in its own crate:
//!
//! 1. [`PairFilter`] keeps the translation pairs both vocabularies know.
//! 2. [`MappingTrainer`] fits `W (target_dim × source_dim)` with one SGD
//!    regression per target dimension.
//! 3. [`SimilarityRanker`] maps a query with `W` and ranks every target word
//!    by dot product with its unit-normalized vector.
//!
//! [`BilingualMapper`] runs all three behind a single object.
//!
//! ## Quick Start
//!
//! ```rust
//! use hashi::{BilingualMapper, BilingualPair, InMemorySpace, LanguagePair, MapperConfig};
//!
//! let en = InMemorySpace::new(3, vec![
//!     ("mother", vec![1.0, 0.0, 0.0]),
//!     ("father", vec![0.0, 1.0, 0.0]),
//!     ("house", vec![0.0, 0.0, 1.0]),
//! ]).unwrap();
//! let de = InMemorySpace::new(2, vec![
//!     ("Mutter", vec![1.0, 0.0]),
//!     ("Vater", vec![0.0, 1.0]),
//! ]).unwrap();
//!
//! let pairs = vec![
//!     BilingualPair::new("mother", "Mutter"),
//!     BilingualPair::new("father", "Vater"),
//! ];
//! let mapper = BilingualMapper::new(
//!     LanguagePair::new("en", "de"), en, de, pairs, MapperConfig::default(),
//! ).unwrap();
//!
//! mapper.train().unwrap();
//! assert_eq!(mapper.mapping().unwrap().shape(), (2, 3));
//!
//! let candidates = mapper.most_similar("mother", 10).unwrap();
//! assert!(candidates.len() <= 2);
//! assert!(mapper.most_similar("Haus", 10).unwrap().is_empty());
//! ```
pub mod engine;

// Re-export primary API
pub use engine::{BilingualMapper, MapperConfig};
pub use hashi_core::{
    BilingualPair, Candidate, EmbeddingSpace, HashiError, InMemorySpace, LanguagePair,
    MappingMatrix, PairFilter, Result, SimilarityResult,
};
pub use hashi_trainer::{
    LearningRate, MappingTrainer, SgdConfig, TrainerConfig, TrainingReport,
};
pub use hashi_vecdb::{SimilarityRanker, DEFAULT_CUTOFF};
