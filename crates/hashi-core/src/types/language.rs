use serde::{Deserialize, Serialize};

/// Codes naming the two languages a mapping translates between.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language of the source embedding space (e.g. `"en"`).
    pub source: String,
    /// Language of the target embedding space (e.g. `"de"`).
    pub target: String,
}

impl LanguagePair {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}
