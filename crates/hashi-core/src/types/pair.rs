use serde::{Deserialize, Serialize};

/// A known translation: a source-language word and its target-language
/// counterpart, used as supervision when fitting a mapping.
///
/// Deserializes either from `{"source": .., "target": ..}` or from the
/// two-element array form `["mother", "Mutter"]` used by word-pair lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PairRepr")]
pub struct BilingualPair {
    /// Word in the source language.
    pub source: String,
    /// Word in the target language.
    pub target: String,
}

impl BilingualPair {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for BilingualPair {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target)
    }
}

impl std::fmt::Display for BilingualPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.source, self.target)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PairRepr {
    Tuple(String, String),
    Struct { source: String, target: String },
}

impl From<PairRepr> for BilingualPair {
    fn from(repr: PairRepr) -> Self {
        match repr {
            PairRepr::Tuple(source, target) | PairRepr::Struct { source, target } => {
                Self { source, target }
            }
        }
    }
}
