use serde::{Deserialize, Serialize};

/// A target-language word proposed as a translation, with its similarity
/// score against the mapped query vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub word: String,
    pub score: f32,
}

impl Candidate {
    #[must_use]
    pub fn new(word: impl Into<String>, score: f32) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// Ranked translation candidates, best first.
///
/// An empty result is the normal answer for a query word the source space
/// does not know. Serializes for reporting; it is only built by ranking,
/// so there is no `Deserialize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityResult {
    candidates: Vec<Candidate>,
}

impl SimilarityResult {
    /// Wraps candidates that are already sorted by descending score.
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The highest-scoring candidate, if any.
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Candidate words in rank order.
    pub fn words(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.word.as_str()).collect()
    }

    /// Returns `true` if `word` appears anywhere in the ranking.
    pub fn contains(&self, word: &str) -> bool {
        self.candidates.iter().any(|c| c.word == word)
    }

    /// 0-based rank of `word`, if present.
    pub fn position(&self, word: &str) -> Option<usize> {
        self.candidates.iter().position(|c| c.word == word)
    }

    pub fn into_vec(self) -> Vec<Candidate> {
        self.candidates
    }
}

impl IntoIterator for SimilarityResult {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

impl<'a> IntoIterator for &'a SimilarityResult {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl std::fmt::Display for SimilarityResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, candidate) in self.candidates.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:.3}", candidate.word, candidate.score)?;
        }
        write!(f, "]")
    }
}
