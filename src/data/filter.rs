use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

use super::model::{AppDataset, AppRecord};

// ---------------------------------------------------------------------------
// Selection values
// ---------------------------------------------------------------------------

/// Sentinel that disables a filter clause.
pub const ALL: &str = "All";

/// One filter clause: either disabled (`All`) or pinned to a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    /// `true` when the clause is disabled or `pred` holds for the pinned value.
    pub fn admits(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => pred(v),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl Selection<String> {
    /// `"All"` disables the clause, anything else is an exact value.
    pub fn from_label(label: &str) -> Self {
        if label == ALL {
            Selection::All
        } else {
            Selection::Only(label.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Size buckets
// ---------------------------------------------------------------------------

/// Upper bound (inclusive) of the `Small` bucket, in MB.
pub const SMALL_MAX_MB: f64 = 20.0;
/// Upper bound (inclusive) of the `Medium` bucket, in MB.
pub const MEDIUM_MAX_MB: f64 = 50.0;

/// `Small` ≤ 20 MB < `Medium` ≤ 50 MB < `Large`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeBucket {
    Small,
    Medium,
    Large,
}

impl SizeBucket {
    pub const ALL: [SizeBucket; 3] = [SizeBucket::Small, SizeBucket::Medium, SizeBucket::Large];

    /// The single bucket a size falls into.
    pub fn classify(size_mb: f64) -> Self {
        if size_mb <= SMALL_MAX_MB {
            SizeBucket::Small
        } else if size_mb <= MEDIUM_MAX_MB {
            SizeBucket::Medium
        } else {
            SizeBucket::Large
        }
    }

    pub fn contains(self, size_mb: f64) -> bool {
        Self::classify(size_mb) == self
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::Small => "Small",
            SizeBucket::Medium => "Medium",
            SizeBucket::Large => "Large",
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeBucket {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SizeBucket::ALL
            .into_iter()
            .find(|b| b.label() == s)
            .ok_or_else(|| ConfigurationError::UnknownSizeBucket(s.to_string()))
    }
}

impl FromStr for Selection<SizeBucket> {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSelection – the caller-held filter state
// ---------------------------------------------------------------------------

/// Current value of the four dashboard filters. Default: everything `All`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub category: Selection<String>,
    pub genre: Selection<String>,
    pub size_bucket: Selection<SizeBucket>,
    pub content_rating: Selection<String>,
}

impl FilterSelection {
    /// Build from the string form the widgets use (`"All"` as sentinel).
    pub fn from_labels(
        category: &str,
        genre: &str,
        size_bucket: &str,
        content_rating: &str,
    ) -> Result<Self, ConfigurationError> {
        Ok(FilterSelection {
            category: Selection::from_label(category),
            genre: Selection::from_label(genre),
            size_bucket: size_bucket.parse()?,
            content_rating: Selection::from_label(content_rating),
        })
    }

    /// Reject pinned values the dataset never offers.
    ///
    /// [`filter_records`] itself stays permissive; a value that matches no
    /// option is only caught here.
    pub fn validate(&self, dataset: &AppDataset) -> Result<(), ConfigurationError> {
        if let Selection::Only(c) = &self.category {
            if !dataset.categories.contains(c) {
                return Err(ConfigurationError::UnknownCategory(c.clone()));
            }
        }
        if let Selection::Only(g) = &self.genre {
            if !dataset.genres.contains(g) {
                return Err(ConfigurationError::UnknownGenre(g.clone()));
            }
        }
        if let Selection::Only(r) = &self.content_rating {
            if !dataset.content_ratings.contains(r) {
                return Err(ConfigurationError::UnknownContentRating(r.clone()));
            }
        }
        Ok(())
    }

    /// Whether every clause is disabled.
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_all()
            && self.genre.is_all()
            && self.size_bucket.is_all()
            && self.content_rating.is_all()
    }

    /// Conjunction of all active clauses.
    pub fn matches(&self, rec: &AppRecord) -> bool {
        self.category.admits(|c| rec.category == *c)
            && self.genre.admits(|g| rec.genres.contains(g))
            && self.size_bucket.admits(|b| b.contains(rec.size_mb))
            && self.content_rating.admits(|r| rec.content_rating == *r)
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return indices of records that pass the selection, in dataset order.
pub fn filtered_indices(dataset: &AppDataset, selection: &FilterSelection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Stable filter over any sequence of records.
///
/// Takes references so that an already filtered sequence can be filtered again.
pub fn filter_records<'a, I>(records: I, selection: &FilterSelection) -> Vec<&'a AppRecord>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    records
        .into_iter()
        .filter(|rec| selection.matches(rec))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawAppRecord;

    fn dataset() -> AppDataset {
        let row = |app: &str, cat: &str, size: &str, genres: &str, cr: &str| RawAppRecord {
            app: Some(app.into()),
            category: Some(cat.into()),
            size: Some(size.into()),
            genres: Some(genres.into()),
            content_rating: Some(cr.into()),
            ..Default::default()
        };
        AppDataset::from_raw(&[
            row("small", "GAME", "20M", "Action", "Everyone"),
            row("medium", "TOOLS", "20.5M", "Tools;Education", "Teen"),
            row("edge", "GAME", "50M", "Action;Puzzle", "Teen"),
            row("large", "GAME", "51M", "Puzzle", "Everyone"),
            row("varies", "TOOLS", "Varies with device", "Tools", "Everyone"),
        ])
        .unwrap()
    }

    fn names(recs: &[&AppRecord]) -> Vec<String> {
        recs.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn default_selection_is_identity() {
        let ds = dataset();
        let sel = FilterSelection::default();
        assert!(sel.is_unfiltered());
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(SizeBucket::classify(0.0), SizeBucket::Small);
        assert_eq!(SizeBucket::classify(20.0), SizeBucket::Small);
        assert_eq!(SizeBucket::classify(20.0001), SizeBucket::Medium);
        assert_eq!(SizeBucket::classify(50.0), SizeBucket::Medium);
        assert_eq!(SizeBucket::classify(50.0001), SizeBucket::Large);
    }

    #[test]
    fn size_clause() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("All", "All", "Medium", "All").unwrap();
        let out = filter_records(&ds.records, &sel);
        assert_eq!(names(&out), vec!["medium", "edge"]);
    }

    #[test]
    fn clauses_are_conjunctive() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("GAME", "Puzzle", "All", "Teen").unwrap();
        assert_eq!(filtered_indices(&ds, &sel), vec![2]);
    }

    #[test]
    fn genre_is_set_membership_not_substring() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("All", "Tool", "All", "All").unwrap();
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn unknown_size_bucket_is_a_configuration_error() {
        let err = FilterSelection::from_labels("All", "All", "Huge", "All").unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownSizeBucket("Huge".into()));
    }

    #[test]
    fn known_values_validate() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("GAME", "Puzzle", "Large", "Teen").unwrap();
        assert_eq!(sel.validate(&ds), Ok(()));
        assert_eq!(FilterSelection::default().validate(&ds), Ok(()));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("GAMEZ", "All", "All", "All").unwrap();
        assert_eq!(
            sel.validate(&ds),
            Err(ConfigurationError::UnknownCategory("GAMEZ".into()))
        );
    }

    #[test]
    fn unknown_genre_is_rejected() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("All", "Tool", "All", "All").unwrap();
        assert_eq!(
            sel.validate(&ds),
            Err(ConfigurationError::UnknownGenre("Tool".into()))
        );
    }

    #[test]
    fn unknown_content_rating_is_rejected() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("All", "All", "All", "Adults only 18+").unwrap();
        assert_eq!(
            sel.validate(&ds),
            Err(ConfigurationError::UnknownContentRating("Adults only 18+".into()))
        );
    }

    #[test]
    fn refiltering_is_idempotent() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("All", "All", "Small", "Everyone").unwrap();
        let once = filter_records(&ds.records, &sel);
        let twice = filter_records(once.iter().copied(), &sel);
        assert_eq!(once, twice);
        assert_eq!(names(&once), vec!["small", "varies"]);
    }
}
