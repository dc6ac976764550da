//! Plain-text rendering of controller snapshots.

use std::fmt::Write;

use reelcache_core::catalog::format::{
    format_runtime, format_usd, poster_url, DEFAULT_POSTER_SIZE, MISSING_VALUE,
};
use reelcache_core::{Genre, ListSnapshot, Movie, MovieDetails};

/// One listing line: title, year and genre names.
pub fn movie_line(movie: &Movie, snapshot: &ListSnapshot) -> String {
    let genres: Vec<&str> = movie
        .genre_ids()
        .iter()
        .filter_map(|id| snapshot.genre_name(*id))
        .collect();

    let mut line = format!("{:>8}  {} ({})", movie.id, movie.title, movie.year_label());
    if !genres.is_empty() {
        let _ = write!(line, "  [{}]", genres.join(", "));
    }
    line
}

/// The filtered listing with a status header.
pub fn list(snapshot: &ListSnapshot) -> String {
    let mut out = String::new();

    if snapshot.is_offline {
        out.push_str("You are offline. Showing cached movies.\n");
    }

    let _ = writeln!(
        out,
        "Showing {} of {} movies (pages loaded: {}/{})",
        snapshot.filtered.len(),
        snapshot.items.len(),
        snapshot.current_page.saturating_sub(1),
        snapshot.total_pages
    );

    if let Some(error) = &snapshot.error_message {
        let _ = writeln!(out, "{}", error);
    }

    if snapshot.filtered.is_empty() && !snapshot.items.is_empty() {
        out.push_str("No movies match your filters.\n");
    }

    for movie in &snapshot.filtered {
        let _ = writeln!(out, "{}", movie_line(movie, snapshot));
    }

    out
}

/// Full details view.
pub fn details(details: &MovieDetails, image_base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", details.title);
    let _ = writeln!(out, "{}", "=".repeat(details.title.chars().count()));

    let genres = details
        .genres
        .as_ref()
        .filter(|g| !g.is_empty())
        .map(|g| g.iter().map(|genre| genre.name.as_str()).collect::<Vec<_>>().join(", "))
        .unwrap_or_else(|| MISSING_VALUE.to_string());

    let languages = details
        .spoken_languages
        .as_ref()
        .filter(|l| !l.is_empty())
        .map(|l| l.iter().map(|lang| lang.display_name()).collect::<Vec<_>>().join(", "))
        .unwrap_or_else(|| MISSING_VALUE.to_string());

    let rows = [
        ("Released", details.year_month_label()),
        ("Genres", genres),
        ("Status", details.status.clone().unwrap_or_else(|| MISSING_VALUE.to_string())),
        ("Languages", languages),
        ("Runtime", format_runtime(details.runtime)),
        ("Budget", format_usd(details.budget)),
        ("Revenue", format_usd(details.revenue)),
        ("Homepage", non_empty(details.homepage.as_deref())),
        (
            "Poster",
            poster_url(image_base_url, details.poster_path.as_deref(), DEFAULT_POSTER_SIZE)
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
        ),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<10} {}", format!("{}:", label), value);
    }

    if let Some(overview) = details.overview.as_deref().filter(|o| !o.trim().is_empty()) {
        let _ = writeln!(out, "\nOverview\n{}", overview);
    }

    out
}

/// Genre table.
pub fn genres(genres: &[Genre]) -> String {
    if genres.is_empty() {
        return "No genres available.\n".to_string();
    }
    genres
        .iter()
        .map(|g| format!("{:>6}  {}\n", g.id, g.name))
        .collect()
}

fn non_empty(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING_VALUE.to_string(),
    }
}
