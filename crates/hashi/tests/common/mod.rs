//! Synthetic English/German embedding spaces for end-to-end tests.
//!
//! The German space is the image of the English one under a fixed random
//! linear map, so a well-trained mapping sends every English word onto its
//! German counterpart. Both spaces also carry words with no counterpart.

#![allow(dead_code)]

use std::sync::Arc;

use hashi::{BilingualPair, InMemorySpace};

/// Translations that always exist in both spaces.
pub const NAMED_PAIRS: &[(&str, &str)] = &[
    ("mother", "Mutter"),
    ("father", "Vater"),
    ("house", "Haus"),
    ("dog", "Hund"),
    ("cat", "Katze"),
    ("water", "Wasser"),
    ("child", "Kind"),
    ("day", "Tag"),
    ("night", "Nacht"),
    ("tree", "Baum"),
];

/// Translations present in both spaces but never used for training.
pub const HELD_OUT_PAIRS: &[(&str, &str)] = &[
    ("sun", "Sonne"),
    ("moon", "Mond"),
    ("bread", "Brot"),
    ("school", "Schule"),
];

/// Number of aligned (translatable) words, named ones included.
pub const ALIGNED_WORDS: usize = 500;

/// Number of aligned words whose pairs are offered for training.
pub const TRAINING_WORDS: usize = 400;

pub struct Fixture {
    pub en: Arc<InMemorySpace>,
    pub de: Arc<InMemorySpace>,
    /// Pair list as it would be read from a JSON word-pair file.
    pub pairs_json: String,
}

impl Fixture {
    pub fn pairs(&self) -> Vec<BilingualPair> {
        serde_json::from_str(&self.pairs_json).expect("fixture pairs are valid JSON")
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}

fn aligned_words() -> Vec<(String, String)> {
    let mut words: Vec<(String, String)> = NAMED_PAIRS
        .iter()
        .map(|&(en, de)| (en.to_string(), de.to_string()))
        .collect();
    let generated = ALIGNED_WORDS - NAMED_PAIRS.len() - HELD_OUT_PAIRS.len();
    words.extend((0..generated).map(|i| (format!("word{i}"), format!("Wort{i}"))));
    // held-out words sit past TRAINING_WORDS so they never reach the pair list
    words.extend(
        HELD_OUT_PAIRS
            .iter()
            .map(|&(en, de)| (en.to_string(), de.to_string())),
    );
    words
}

/// Builds English (`source_dim`) and German (`target_dim`) spaces.
pub fn build(source_dim: usize, target_dim: usize) -> Fixture {
    let mut rng = oorandom::Rand32::new(2013);
    let mut uniform = move || rng.rand_float() * 2.0 - 1.0;

    let scale = 1.0 / (source_dim as f32).sqrt();
    let map: Vec<Vec<f32>> = (0..target_dim)
        .map(|_| (0..source_dim).map(|_| uniform() * scale).collect())
        .collect();
    let apply = |v: &[f32]| -> Vec<f32> {
        map.iter()
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum::<f32>())
            .collect()
    };

    let aligned = aligned_words();
    let mut en = Vec::new();
    let mut de = Vec::new();
    for (en_word, de_word) in &aligned {
        let v: Vec<f32> = (0..source_dim).map(|_| uniform()).collect();
        de.push((de_word.clone(), apply(&v)));
        en.push((en_word.clone(), v));
    }
    for i in 0..50 {
        en.push((format!("unpaired{i}"), (0..source_dim).map(|_| uniform()).collect()));
        de.push((format!("Rauschen{i}"), (0..target_dim).map(|_| uniform()).collect()));
    }

    let mut listed: Vec<[String; 2]> = aligned[..TRAINING_WORDS]
        .iter()
        .map(|(en, de)| [en.clone(), de.clone()])
        .collect();
    // pairs only one side knows; the filter must drop them
    listed.push(["mother".into(), "Mama".into()]);
    listed.push(["grandmother".into(), "Mutter".into()]);
    listed.push(["spaceship".into(), "Raumschiff".into()]);
    let pairs_json = serde_json::to_string(&listed).expect("pairs serialize");

    Fixture {
        en: Arc::new(InMemorySpace::new(source_dim, en).expect("valid English space")),
        de: Arc::new(InMemorySpace::new(target_dim, de).expect("valid German space")),
        pairs_json,
    }
}
