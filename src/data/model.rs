use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

use super::normalize::normalize;

// ---------------------------------------------------------------------------
// RawAppRecord – one row exactly as delivered by the data source
// ---------------------------------------------------------------------------

/// A catalog row before normalization. Every field is optional text.
///
/// Column names follow the Play Store export (`App`, `Category`, ...). Both
/// `ContentRating` (bundled JSON) and `Content Rating` (Kaggle CSV) are
/// accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAppRecord {
    #[serde(rename = "App", default, deserialize_with = "lenient_string")]
    pub app: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "lenient_string")]
    pub rating: Option<String>,
    #[serde(rename = "Reviews", default, deserialize_with = "lenient_string")]
    pub reviews: Option<String>,
    #[serde(rename = "Size", default, deserialize_with = "lenient_string")]
    pub size: Option<String>,
    #[serde(rename = "Installs", default, deserialize_with = "lenient_string")]
    pub installs: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "lenient_string")]
    pub app_type: Option<String>,
    #[serde(
        rename = "ContentRating",
        alias = "Content Rating",
        default,
        deserialize_with = "lenient_string"
    )]
    pub content_rating: Option<String>,
    #[serde(rename = "Genres", default, deserialize_with = "lenient_string")]
    pub genres: Option<String>,
    #[serde(
        rename = "Last Updated",
        alias = "LastUpdated",
        default,
        deserialize_with = "lenient_string"
    )]
    pub last_updated: Option<String>,
}

/// Accept strings, numbers, booleans and nulls; everything becomes text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientVisitor;

    impl<'de> Visitor<'de> for LenientVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        // CSV reports integers past the 64-bit range as 128-bit.
        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
            Ok(Some(v.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(LenientVisitor)
        }
    }

    deserializer.deserialize_any(LenientVisitor)
}

// ---------------------------------------------------------------------------
// AppRecord – one normalized catalog entry
// ---------------------------------------------------------------------------

/// A catalog entry with typed fields. Immutable once built by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppRecord {
    pub name: String,
    pub category: String,
    pub genres: BTreeSet<String>,
    pub content_rating: String,
    /// `None` when the source value was missing, unparsable or outside `[0, 5]`.
    pub rating: Option<f64>,
    pub review_count: u64,
    pub install_count: u64,
    pub size_mb: f64,
    pub last_updated: Option<NaiveDate>,
    /// `Free` / `Paid` in the Play Store export.
    pub app_type: String,
}

impl AppRecord {
    /// Rating as charted: absent ratings read as `0`.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// AppDataset – the complete normalized dataset
// ---------------------------------------------------------------------------

/// All normalized records plus the option lists the filter widgets offer.
///
/// Option lists keep first-seen order, which is how the dashboard lists them.
#[derive(Debug, Clone)]
pub struct AppDataset {
    pub records: Vec<AppRecord>,
    pub categories: Vec<String>,
    pub genres: Vec<String>,
    /// Non-empty content rating values only.
    pub content_ratings: Vec<String>,
}

impl AppDataset {
    /// Normalize raw rows and build the option lists.
    pub fn from_raw(raw: &[RawAppRecord]) -> Result<Self, InputError> {
        Self::from_records(raw.iter().map(normalize).collect())
    }

    /// Build option lists from already-normalized records.
    pub fn from_records(records: Vec<AppRecord>) -> Result<Self, InputError> {
        if records.is_empty() {
            return Err(InputError::EmptyDataset);
        }

        let mut categories = FirstSeen::default();
        let mut genres = FirstSeen::default();
        let mut content_ratings = FirstSeen::default();

        for rec in &records {
            categories.push(&rec.category);
            for genre in &rec.genres {
                genres.push(genre);
            }
            if !rec.content_rating.is_empty() {
                content_ratings.push(&rec.content_rating);
            }
        }

        Ok(AppDataset {
            records,
            categories: categories.into_vec(),
            genres: genres.into_vec(),
            content_ratings: content_ratings.into_vec(),
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty. Always `false` for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Distinct values in insertion order.
#[derive(Default)]
struct FirstSeen {
    seen: HashSet<String>,
    order: Vec<String>,
}

impl FirstSeen {
    fn push(&mut self, value: &str) {
        if self.seen.insert(value.to_string()) {
            self.order.push(value.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(app: &str, category: &str, genres: &str, content_rating: &str) -> RawAppRecord {
        RawAppRecord {
            app: Some(app.into()),
            category: Some(category.into()),
            genres: Some(genres.into()),
            content_rating: Some(content_rating.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert_eq!(
            AppDataset::from_raw(&[]).unwrap_err(),
            InputError::EmptyDataset
        );
    }

    #[test]
    fn option_lists_keep_first_seen_order() {
        let ds = AppDataset::from_raw(&[
            raw("A", "TOOLS", "Utility;Productivity", "Everyone"),
            raw("B", "GAME", "Action", ""),
            raw("C", "TOOLS", "Action", "Teen"),
        ])
        .unwrap();

        assert_eq!(ds.categories, vec!["TOOLS", "GAME"]);
        assert_eq!(ds.genres, vec!["Productivity", "Utility", "Action"]);
        assert_eq!(ds.content_ratings, vec!["Everyone", "Teen"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn json_numbers_and_nulls_are_accepted() {
        let rec: RawAppRecord = serde_json::from_str(
            r#"{"App": "X", "Rating": 4.5, "Reviews": 120, "Size": null, "Content Rating": "Teen"}"#,
        )
        .unwrap();
        assert_eq!(rec.rating.as_deref(), Some("4.5"));
        assert_eq!(rec.reviews.as_deref(), Some("120"));
        assert_eq!(rec.size, None);
        assert_eq!(rec.content_rating.as_deref(), Some("Teen"));
        assert_eq!(rec.installs, None);
    }
}
