//! TMDB endpoint catalog: path and query parameters per logical request.

/// A logical request against the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Movie genre list.
    Genres,
    /// Movies sorted by descending popularity, one page per call.
    Trending { page: u32 },
    /// Details of a single movie.
    Details { id: i64 },
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Genres => "/genre/movie/list".to_string(),
            Endpoint::Trending { .. } => "/discover/movie".to_string(),
            Endpoint::Details { id } => format!("/movie/{}", id),
        }
    }

    /// Query parameters, excluding the API key.
    pub fn query(&self, language: &str) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Genres | Endpoint::Details { .. } => {
                vec![("language", language.to_string())]
            }
            Endpoint::Trending { page } => vec![
                ("include_adult", "false".to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("page", page.to_string()),
                ("language", language.to_string()),
            ],
        }
    }

    /// Short label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Genres => "genres",
            Endpoint::Trending { .. } => "trending",
            Endpoint::Details { .. } => "details",
        }
    }
}
