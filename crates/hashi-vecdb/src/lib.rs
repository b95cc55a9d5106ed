//! # Hashi VecDB
//!
//! Similarity search over embedding spaces. Queries are mapped into the
//! target space with a trained [`hashi_core::MappingMatrix`] and scored
//! against every unit-normalized target vector; there is no index
//! structure, so each query costs `O(vocabulary × dimension)`.

pub mod ranker;

pub use ranker::{similarity_scores, top_k, SimilarityRanker, DEFAULT_CUTOFF};
