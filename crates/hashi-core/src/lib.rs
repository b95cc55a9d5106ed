//! # Hashi Core
//!
//! Shared building blocks for learning linear maps between word-embedding
//! spaces: the [`EmbeddingSpace`] contract, bilingual training pairs and
//! their vocabulary filter, the learned [`MappingMatrix`], and ranked
//! [`SimilarityResult`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use hashi_core::{BilingualPair, EmbeddingSpace, InMemorySpace, PairFilter};
//!
//! let en = InMemorySpace::new(2, vec![("mother", vec![1.0, 0.0])]).unwrap();
//! let de = InMemorySpace::new(2, vec![("Mutter", vec![0.0, 1.0])]).unwrap();
//!
//! let pairs = vec![
//!     BilingualPair::new("mother", "Mutter"),
//!     BilingualPair::new("father", "Vater"),
//! ];
//! let kept = PairFilter::new(&en, &de).filter(pairs);
//!
//! assert_eq!(kept, vec![BilingualPair::new("mother", "Mutter")]);
//! assert_eq!(en.dimension(), 2);
//! ```
pub mod error;
pub mod filter;
pub mod space;
pub mod types;

// Re-export primary API
pub use error::{HashiError, Result};
pub use filter::PairFilter;
pub use space::{l2_normalize, EmbeddingSpace, InMemorySpace};
pub use types::{BilingualPair, Candidate, LanguagePair, MappingMatrix, SimilarityResult};
