use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{AppRecord, RawAppRecord};

// ---------------------------------------------------------------------------
// Record normalizer
//
// Every parser here is total: bad input degrades to 0 / empty / None.
// ---------------------------------------------------------------------------

/// Sentinel the Play Store uses instead of a size.
pub const VARIES_WITH_DEVICE: &str = "Varies with device";

/// Label used when a row carries no app name.
pub const UNKNOWN_APP: &str = "Unknown";

/// Turn one raw row into a typed [`AppRecord`].
pub fn normalize(raw: &RawAppRecord) -> AppRecord {
    let name = match raw.app.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN_APP.to_string(),
    };

    AppRecord {
        name,
        category: text(&raw.category),
        genres: parse_genres(raw.genres.as_deref()),
        content_rating: text(&raw.content_rating),
        rating: raw.rating.as_deref().and_then(parse_rating),
        review_count: raw.reviews.as_deref().map_or(0, parse_reviews),
        install_count: raw.installs.as_deref().map_or(0, parse_installs),
        size_mb: raw.size.as_deref().map_or(0.0, parse_size),
        last_updated: raw.last_updated.as_deref().and_then(parse_last_updated),
        app_type: text(&raw.app_type),
    }
}

fn text(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Size in MB from strings like `"19M"`, `"512k"` or `"Varies with device"`.
pub fn parse_size(size: &str) -> f64 {
    if size == VARIES_WITH_DEVICE {
        return 0.0;
    }
    let cleaned: String = size
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    let magnitude = match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return 0.0,
    };
    if size.contains(['k', 'K']) {
        magnitude / 1024.0
    } else {
        magnitude
    }
}

/// Install count from strings like `"10,000+"`.
pub fn parse_installs(installs: &str) -> u64 {
    let trimmed = installs.trim();
    let trimmed = trimmed.strip_suffix('+').unwrap_or(trimmed);
    trimmed.replace(',', "").parse().unwrap_or(0)
}

/// Review count; anything that is not a plain non-negative integer is 0.
pub fn parse_reviews(reviews: &str) -> u64 {
    reviews.trim().parse().unwrap_or(0)
}

/// Star rating in `[0, 5]`, or `None`.
pub fn parse_rating(rating: &str) -> Option<f64> {
    rating
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| (0.0..=5.0).contains(r))
}

/// Genre set from a `;`-delimited field.
pub fn parse_genres(genres: Option<&str>) -> BTreeSet<String> {
    genres
        .map(|g| {
            g.split(';')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `"January 7, 2018"` or `"2018-01-07"`.
pub fn parse_last_updated(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("19M"), 19.0);
        assert_eq!(parse_size("512k"), 0.5);
        assert_eq!(parse_size("512K"), 0.5);
        assert_eq!(parse_size("8.7M"), 8.7);
        assert_eq!(parse_size(VARIES_WITH_DEVICE), 0.0);
        assert_eq!(parse_size(""), 0.0);
        assert_eq!(parse_size("M"), 0.0);
        assert_eq!(parse_size("1.2.3M"), 0.0);
    }

    #[test]
    fn install_parsing() {
        assert_eq!(parse_installs("10,000+"), 10_000);
        assert_eq!(parse_installs("1,000,000,000+"), 1_000_000_000);
        assert_eq!(parse_installs("500"), 500);
        assert_eq!(parse_installs(""), 0);
        assert_eq!(parse_installs("Free"), 0);
        assert_eq!(parse_installs("-5"), 0);
    }

    #[test]
    fn review_and_rating_parsing() {
        assert_eq!(parse_reviews("159"), 159);
        assert_eq!(parse_reviews("3.0M"), 0);
        assert_eq!(parse_reviews("-1"), 0);
        assert_eq!(parse_rating("4.1"), Some(4.1));
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_rating("19"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn genre_parsing() {
        let g = parse_genres(Some("Art & Design;Pretend Play"));
        assert!(g.contains("Art & Design"));
        assert!(g.contains("Pretend Play"));
        assert_eq!(g.len(), 2);
        assert!(parse_genres(None).is_empty());
        assert!(parse_genres(Some(";;")).is_empty());
    }

    #[test]
    fn date_parsing() {
        assert_eq!(
            parse_last_updated("January 7, 2018"),
            NaiveDate::from_ymd_opt(2018, 1, 7)
        );
        assert_eq!(
            parse_last_updated("2018-08-01"),
            NaiveDate::from_ymd_opt(2018, 8, 1)
        );
        assert_eq!(parse_last_updated("yesterday"), None);
    }

    #[test]
    fn normalize_is_total() {
        let rec = normalize(&RawAppRecord::default());
        assert_eq!(rec.name, UNKNOWN_APP);
        assert_eq!(rec.install_count, 0);
        assert_eq!(rec.review_count, 0);
        assert_eq!(rec.size_mb, 0.0);
        assert_eq!(rec.rating, None);
        assert!(rec.genres.is_empty());
        assert!(rec.last_updated.is_none());
    }
}
