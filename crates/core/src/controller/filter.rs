//! Local filtering of accumulated listing items.

use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::catalog::Movie;

/// Fold text for matching: canonical decomposition, combining marks removed, lowercased.
pub fn fold_text(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `item_genres` shares at least one ID with `selected`; an empty selection matches all.
pub fn genres_match(item_genres: &[i64], selected: &BTreeSet<i64>) -> bool {
    selected.is_empty() || item_genres.iter().any(|id| selected.contains(id))
}

/// Items matching both the text and the genre filter, in list order.
pub fn apply_filters(items: &[Movie], search_text: &str, genre_ids: &BTreeSet<i64>) -> Vec<Movie> {
    let query = fold_text(search_text);
    items
        .iter()
        .filter(|item| query.is_empty() || fold_text(&item.title).contains(&query))
        .filter(|item| genres_match(item.genre_ids(), genre_ids))
        .cloned()
        .collect()
}
