//! Catalog data model shared by the remote client, the cache and the controllers.

use serde::{Deserialize, Serialize};

use super::format::{parse_release_date, MISSING_VALUE};

/// A movie genre.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    /// TMDB genre ID.
    pub id: i64,
    /// Display name (localized by the remote API).
    pub name: String,
}

impl Genre {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Wire envelope of the genre list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

/// A catalog item as returned by the trending/discover listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: i64,
    /// Movie title.
    pub title: String,
    /// Poster path (relative to the image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Genre IDs, in the order the API returned them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_ids: Option<Vec<i64>>,
}

impl Movie {
    /// Release year, if the release date parses.
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        parse_release_date(self.release_date.as_deref()).map(|d| d.year())
    }

    /// Release year for display; `"—"` when the date is absent or malformed.
    pub fn year_label(&self) -> String {
        self.year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    }

    /// Genre IDs as a slice (empty when the API omitted them).
    pub fn genre_ids(&self) -> &[i64] {
        self.genre_ids.as_deref().unwrap_or(&[])
    }
}

/// A language spoken in a movie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english_name: Option<String>,
    /// ISO 639-1 language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_639_1: Option<String>,
    /// Native name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SpokenLanguage {
    /// Stable identifier: the language code, then the English name, then the native name.
    pub fn id(&self) -> &str {
        self.iso_639_1
            .as_deref()
            .or(self.english_name.as_deref())
            .or(self.name.as_deref())
            .unwrap_or("unknown")
    }

    /// Best display name.
    pub fn display_name(&self) -> &str {
        self.english_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_else(|| self.id())
    }
}

/// Full details of a single movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<Genre>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Budget in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<i64>,
    /// Revenue in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    /// Release status (e.g. "Released").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Runtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<i64>,
}

impl MovieDetails {
    /// Genre IDs in listing form.
    pub fn genre_ids(&self) -> Vec<i64> {
        self.genres
            .as_ref()
            .map(|g| g.iter().map(|genre| genre.id).collect())
            .unwrap_or_default()
    }

    /// Release month and year for display, e.g. "September 1995".
    pub fn year_month_label(&self) -> String {
        parse_release_date(self.release_date.as_deref())
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// 1-based page number.
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> Page<T> {
    /// Whether a page after this one exists.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}
