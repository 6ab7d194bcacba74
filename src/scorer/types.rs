use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub total: f32,
    pub bigram: f32,
    pub lexicon: f32,

    pub pairs_seen: usize,
    pub pairs_unseen: usize,

    // (word, occurrences), most valuable first
    pub matched_words: Vec<(String, usize)>,
}
