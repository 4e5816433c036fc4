//! Mapping vocabulary strings onto embedding-table rows.
//!
//! Pretrained word vectors are commonly shipped as a table of vectors plus a
//! `key -> row` map, where each key is the fingerprint of the word under seed 1.
//! Resolving a word list against that map yields `(word, row)` pairs.

use std::collections::BTreeMap;

use crate::murmur::hash64;

/// Seed used for vocabulary keys.
pub const VOCAB_SEED: u64 = 1;

#[inline]
pub fn word_key(word: &str) -> u64 {
    hash64(word.as_bytes(), VOCAB_SEED)
}

/// Keeps, in input order, every string that has a row in `key2row`.
pub fn resolve_rows<I, S>(strings: I, key2row: &BTreeMap<u64, u64>) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut words = Vec::new();
    let mut missing = 0usize;
    for string in strings {
        let string = string.into();
        match key2row.get(&word_key(&string)) {
            Some(&row) => words.push((string, row)),
            None => missing += 1,
        }
    }
    log::debug!("resolved {} words, {} without a row", words.len(), missing);
    words
}
