//! # Hashi Trainer
//!
//! Learns the linear map between two embedding spaces from known
//! translation pairs. Training data is stacked into row-aligned matrices
//! ([`TrainingMatrices`]) and every target dimension is fitted by its own
//! SGD regression ([`SgdRegressor`]); [`MappingTrainer`] assembles the
//! resulting coefficient rows into a [`hashi_core::MappingMatrix`].

pub mod data;
pub mod sgd;
pub mod trainer;

pub use data::TrainingMatrices;
pub use sgd::{LearningRate, SgdConfig, SgdFit, SgdRegressor};
pub use trainer::{MappingTrainer, TrainedMapping, TrainerConfig, TrainingReport};
