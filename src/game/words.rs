#![allow(dead_code)]
//! Word catalog for the secret-word game
//!
//! Embeds the catalog at build time and parses it once on first use.
//! Entries carry a hint (shown to impostors when enabled) and a category
//! used only for filtering the random pick.

use once_cell::sync::Lazy;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Embedded word catalog, JSON array of `{word, hint, category}` objects
static CATALOG_DATA: &str = include_str!("../../data/words.json");

/// Pre-parsed catalog
static CATALOG: Lazy<Vec<WordEntry>> =
    Lazy::new(|| serde_json::from_str(CATALOG_DATA).expect("valid embedded word catalog"));

/// One catalog entry. Immutable; no uniqueness constraint on the word text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub hint: String,
    pub category: String,
}

/// Raised when the selected categories match no catalog entry.
/// Callers must keep at least one category selected; there is no retry
/// or fallback here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    EmptySelection,
}

impl std::fmt::Display for WordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordError::EmptySelection => {
                write!(f, "no words available for the selected categories")
            }
        }
    }
}

impl std::error::Error for WordError {}

/// Distinct categories in first-seen catalog order.
pub fn categories() -> Vec<String> {
    let mut seen = Vec::new();
    for entry in CATALOG.iter() {
        if !seen.contains(&entry.category) {
            seen.push(entry.category.clone());
        }
    }
    seen
}

/// Number of entries in the catalog.
pub fn catalog_len() -> usize {
    CATALOG.len()
}

/// Pick a word uniformly among entries whose category is selected.
pub fn pick_random(allowed: &[String]) -> Result<WordEntry, WordError> {
    pick_random_with_rng(allowed, &mut rand::rng())
}

/// Pick a word using a specific RNG (for testing/seeding).
pub fn pick_random_with_rng<R: Rng>(
    allowed: &[String],
    rng: &mut R,
) -> Result<WordEntry, WordError> {
    let eligible: Vec<&WordEntry> = CATALOG
        .iter()
        .filter(|entry| allowed.contains(&entry.category))
        .collect();

    if eligible.is_empty() {
        return Err(WordError::EmptySelection);
    }

    let index = rng.random_range(0..eligible.len());
    Ok(eligible[index].clone())
}
