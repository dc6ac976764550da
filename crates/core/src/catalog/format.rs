//! Display helpers for catalog values.

use chrono::NaiveDate;

/// Placeholder shown for absent or unparseable values.
pub const MISSING_VALUE: &str = "—";

/// Default poster width requested from the image CDN.
pub const DEFAULT_POSTER_SIZE: &str = "w500";

/// Parse a TMDB release date (YYYY-MM-DD). Empty and malformed strings yield `None`.
pub fn parse_release_date(date: Option<&str>) -> Option<NaiveDate> {
    date.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
}

/// Format a runtime in minutes as "2h 7m" or "45m".
pub fn format_runtime(minutes: Option<i64>) -> String {
    match minutes {
        Some(m) if m >= 0 => {
            let (hours, rest) = (m / 60, m % 60);
            if hours > 0 {
                format!("{}h {}m", hours, rest)
            } else {
                format!("{}m", rest)
            }
        }
        _ => MISSING_VALUE.to_string(),
    }
}

/// Format a whole-dollar amount as "$1,234,567".
pub fn format_usd(amount: Option<i64>) -> String {
    let Some(amount) = amount else {
        return MISSING_VALUE.to_string();
    };

    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Build the full poster URL for a relative poster path.
///
/// Returns `None` when the path is absent or empty.
pub fn poster_url(image_base_url: &str, path: Option<&str>, size: &str) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    Some(format!(
        "{}/{}/{}",
        image_base_url.trim_end_matches('/'),
        size,
        trimmed
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_date() {
        assert_eq!(
            parse_release_date(Some("1995-09-22")),
            NaiveDate::from_ymd_opt(1995, 9, 22)
        );
        assert_eq!(parse_release_date(Some("")), None);
        assert_eq!(parse_release_date(Some("1995")), None);
        assert_eq!(parse_release_date(None), None);
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(Some(127)), "2h 7m");
        assert_eq!(format_runtime(Some(45)), "45m");
        assert_eq!(format_runtime(Some(120)), "2h 0m");
        assert_eq!(format_runtime(None), "—");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(Some(0)), "$0");
        assert_eq!(format_usd(Some(999)), "$999");
        assert_eq!(format_usd(Some(1_000)), "$1,000");
        assert_eq!(format_usd(Some(160_000_000)), "$160,000,000");
        assert_eq!(format_usd(Some(-2_500)), "-$2,500");
        assert_eq!(format_usd(None), "—");
    }

    #[test]
    fn test_poster_url() {
        let base = "https://image.tmdb.org/t/p";
        assert_eq!(
            poster_url(base, Some("/abc.jpg"), DEFAULT_POSTER_SIZE).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(
            poster_url("https://image.tmdb.org/t/p/", Some("abc.jpg"), "w185").as_deref(),
            Some("https://image.tmdb.org/t/p/w185/abc.jpg")
        );
        assert_eq!(poster_url(base, Some(""), DEFAULT_POSTER_SIZE), None);
        assert_eq!(poster_url(base, None, DEFAULT_POSTER_SIZE), None);
    }
}
