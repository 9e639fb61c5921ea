use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::model::AppRecord;

// ---------------------------------------------------------------------------
// Aggregator
//
// Each operation is pure. Callers decide whether they pass the filtered
// records or the whole dataset.
// ---------------------------------------------------------------------------

/// Default number of apps shown by the top-N views.
pub const DEFAULT_TOP_N: usize = 10;

/// Rating histogram bins, `floor(rating)` for ratings in `[1, 5]`.
pub const RATING_BINS: [u8; 5] = [1, 2, 3, 4, 5];

/// The first `n` records in their original order. No sorting.
pub fn top_n_truncated<'a, I>(records: I, n: usize) -> Vec<&'a AppRecord>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    records.into_iter().take(n).collect()
}

/// The `n` most reviewed apps, one entry per name.
///
/// The first occurrence of each name wins; ties keep input order.
pub fn most_rated_deduped<'a, I>(records: I, n: usize) -> Vec<&'a AppRecord>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut seen = HashSet::new();
    let mut unique: Vec<&AppRecord> = records
        .into_iter()
        .filter(|&rec| seen.insert(rec.name.as_str()))
        .collect();
    unique.sort_by(|a, b| b.review_count.cmp(&a.review_count));
    unique.truncate(n);
    unique
}

/// Total installs per category, categories in first-seen order.
pub fn installs_by_category<'a, I>(records: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut order: Vec<(String, u64)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for rec in records {
        let i = *slot.entry(rec.category.as_str()).or_insert_with(|| {
            order.push((rec.category.clone(), 0));
            order.len() - 1
        });
        order[i].1 = order[i].1.saturating_add(rec.install_count);
    }
    order
}

/// Counts per rating bin 1..=5. Absent ratings and ratings below 1 are skipped.
pub fn rating_histogram<'a, I>(records: I) -> [usize; 5]
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut bins = [0usize; 5];
    for rating in records.into_iter().filter_map(|rec| rec.rating) {
        if (1.0..=5.0).contains(&rating) {
            let bin = rating.floor() as usize;
            bins[bin - 1] += 1;
        }
    }
    bins
}

/// Records per non-empty content rating, in first-seen order.
pub fn content_rating_distribution<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for rec in records {
        if rec.content_rating.is_empty() {
            continue;
        }
        let i = *slot.entry(rec.content_rating.as_str()).or_insert_with(|| {
            order.push((rec.content_rating.clone(), 0));
            order.len() - 1
        });
        order[i].1 += 1;
    }
    order
}

/// Update activity of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUpdates {
    pub category: String,
    pub count: usize,
    /// Most recent `Last Updated` date seen, if any record had one.
    pub last_updated: Option<NaiveDate>,
}

/// Record count and latest update date per category, in first-seen order.
pub fn updates_by_category<'a, I>(records: I) -> Vec<CategoryUpdates>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    let mut order: Vec<CategoryUpdates> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();
    for rec in records {
        let i = *slot.entry(rec.category.as_str()).or_insert_with(|| {
            order.push(CategoryUpdates {
                category: rec.category.clone(),
                count: 0,
                last_updated: None,
            });
            order.len() - 1
        });
        let entry = &mut order[i];
        entry.count += 1;
        // Option<NaiveDate> orders None below any date.
        entry.last_updated = entry.last_updated.max(rec.last_updated);
    }
    order
}

/// One point of the size/installs comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeInstalls {
    pub name: String,
    pub size_mb: f64,
    pub install_count: u64,
}

/// Size and installs of the first `n` records.
pub fn size_vs_installs<'a, I>(records: I, n: usize) -> Vec<SizeInstalls>
where
    I: IntoIterator<Item = &'a AppRecord>,
{
    records
        .into_iter()
        .take(n)
        .map(|rec| SizeInstalls {
            name: rec.name.clone(),
            size_mb: rec.size_mb,
            install_count: rec.install_count,
        })
        .collect()
}
