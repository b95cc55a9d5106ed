pub mod language;
pub mod mapping;
pub mod pair;
pub mod result;

pub use language::LanguagePair;
pub use mapping::MappingMatrix;
pub use pair::BilingualPair;
pub use result::{Candidate, SimilarityResult};
