use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::color::{type_color, ColorScheme, Rgba};
use crate::error::{ConfigurationError, PipelineError};

use super::aggregate::{
    content_rating_distribution, installs_by_category, most_rated_deduped, rating_histogram,
    size_vs_installs, top_n_truncated, updates_by_category, CategoryUpdates, RATING_BINS,
};
use super::filter::{filter_records, FilterSelection};
use super::model::{AppDataset, AppRecord};

// ---------------------------------------------------------------------------
// View requests
// ---------------------------------------------------------------------------

/// The charts the dashboard can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewRequest {
    /// Reviews, ratings and installs of the first N filtered apps, side by side.
    Overview,
    TopReviews,
    TopRatings,
    TopInstalls,
    MostRatedDeduped,
    InstallsByCategory,
    RatingHistogram,
    ContentRatingDistribution,
    SizeVsInstalls,
    UpdatesByCategory,
}

impl ViewRequest {
    pub const ALL: [ViewRequest; 10] = [
        ViewRequest::Overview,
        ViewRequest::TopReviews,
        ViewRequest::TopRatings,
        ViewRequest::TopInstalls,
        ViewRequest::MostRatedDeduped,
        ViewRequest::InstallsByCategory,
        ViewRequest::RatingHistogram,
        ViewRequest::ContentRatingDistribution,
        ViewRequest::SizeVsInstalls,
        ViewRequest::UpdatesByCategory,
    ];

    /// Stable identifier, also accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            ViewRequest::Overview => "Overview",
            ViewRequest::TopReviews => "TopReviews",
            ViewRequest::TopRatings => "TopRatings",
            ViewRequest::TopInstalls => "TopInstalls",
            ViewRequest::MostRatedDeduped => "MostRatedDeduped",
            ViewRequest::InstallsByCategory => "InstallsByCategory",
            ViewRequest::RatingHistogram => "RatingHistogram",
            ViewRequest::ContentRatingDistribution => "ContentRatingDistribution",
            ViewRequest::SizeVsInstalls => "SizeVsInstalls",
            ViewRequest::UpdatesByCategory => "UpdatesByCategory",
        }
    }

    /// Heading shown above the chart.
    pub fn title(self) -> &'static str {
        match self {
            ViewRequest::Overview => "Reviews, Ratings, and Installs per App",
            ViewRequest::TopReviews => "Number of Reviews per App",
            ViewRequest::TopRatings => "Rating per App",
            ViewRequest::TopInstalls => "Installs per App",
            ViewRequest::MostRatedDeduped => "Top Most Rated Apps by Type",
            ViewRequest::InstallsByCategory => "Number of Installs by Category",
            ViewRequest::RatingHistogram => "App Ratings Distribution",
            ViewRequest::ContentRatingDistribution => "Content Ratings Distribution",
            ViewRequest::SizeVsInstalls => "App Size and Number of Installs",
            ViewRequest::UpdatesByCategory => "Number of Updates by Category",
        }
    }

    /// Whether the view honours the active [`FilterSelection`].
    ///
    /// Category totals, content rating counts and update recency always cover
    /// the whole dataset.
    pub fn uses_selection(self) -> bool {
        !matches!(
            self,
            ViewRequest::InstallsByCategory
                | ViewRequest::ContentRatingDistribution
                | ViewRequest::UpdatesByCategory
        )
    }
}

impl fmt::Display for ViewRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewRequest {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewRequest::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownView(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Chart series – what renderers consume
// ---------------------------------------------------------------------------

/// One labelled run of values, one colour per value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDataset {
    pub label: String,
    pub values: Vec<f64>,
    pub colors: Vec<Rgba>,
}

/// Labels plus one or more datasets over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<SeriesDataset>,
}

impl ChartSeries {
    pub fn dataset(&self, label: &str) -> Option<&SeriesDataset> {
        self.datasets.iter().find(|d| d.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub const REVIEWS_LABEL: &str = "Number of Reviews";
pub const RATINGS_LABEL: &str = "Ratings";
pub const INSTALLS_LABEL: &str = "Installs";
pub const CATEGORY_INSTALLS_LABEL: &str = "Number of Installs";
pub const RATING_HISTOGRAM_LABEL: &str = "App Ratings";
pub const CONTENT_RATINGS_LABEL: &str = "Content Ratings";
pub const SIZE_LABEL: &str = "App Size (MB)";
pub const UPDATES_LABEL: &str = "Number of Updates";
pub const UPDATE_LAG_LABEL: &str = "Days Behind Latest Update";

/// Incrementally assembles a [`ChartSeries`], colouring each dataset as it goes.
struct SeriesBuilder<'c> {
    labels: Vec<String>,
    datasets: Vec<SeriesDataset>,
    colors: &'c mut dyn ColorScheme,
}

impl<'c> SeriesBuilder<'c> {
    fn new(labels: Vec<String>, colors: &'c mut dyn ColorScheme) -> Self {
        SeriesBuilder {
            labels,
            datasets: Vec::new(),
            colors,
        }
    }

    fn dataset(mut self, label: &str, values: Vec<f64>) -> Self {
        let colors = self.colors.assign(values.len());
        self.datasets.push(SeriesDataset {
            label: label.to_string(),
            values,
            colors,
        });
        self
    }

    fn dataset_with_colors(mut self, label: &str, values: Vec<f64>, colors: Vec<Rgba>) -> Self {
        self.datasets.push(SeriesDataset {
            label: label.to_string(),
            values,
            colors,
        });
        self
    }

    fn finish(self) -> ChartSeries {
        ChartSeries {
            labels: self.labels,
            datasets: self.datasets,
        }
    }
}

fn names(records: &[&AppRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Filter the dataset (when the view honours filters) and aggregate it into
/// chart-ready series.
///
/// Fails with [`ConfigurationError`] when the selection pins a value the
/// dataset does not contain or `top_n` is zero.
pub fn build_series(
    dataset: &AppDataset,
    selection: &FilterSelection,
    view: ViewRequest,
    top_n: usize,
    colors: &mut dyn ColorScheme,
) -> Result<ChartSeries, PipelineError> {
    if top_n == 0 {
        return Err(ConfigurationError::InvalidTopN(top_n).into());
    }
    selection.validate(dataset)?;
    let filtered = filter_records(&dataset.records, selection);
    Ok(series_for(dataset, &filtered, view, top_n, colors))
}

/// Same as [`build_series`] with records already filtered by the caller.
///
/// `filtered` is ignored by the views that always cover the whole dataset.
pub fn series_for(
    dataset: &AppDataset,
    filtered: &[&AppRecord],
    view: ViewRequest,
    top_n: usize,
    colors: &mut dyn ColorScheme,
) -> ChartSeries {
    let all = &dataset.records;

    match view {
        ViewRequest::Overview => {
            let top = top_n_truncated(filtered.iter().copied(), top_n);
            SeriesBuilder::new(names(&top), colors)
                .dataset(REVIEWS_LABEL, reviews(&top))
                .dataset(RATINGS_LABEL, ratings(&top))
                .dataset(INSTALLS_LABEL, installs(&top))
                .finish()
        }
        ViewRequest::TopReviews => {
            let top = top_n_truncated(filtered.iter().copied(), top_n);
            SeriesBuilder::new(names(&top), colors)
                .dataset(REVIEWS_LABEL, reviews(&top))
                .finish()
        }
        ViewRequest::TopRatings => {
            let top = top_n_truncated(filtered.iter().copied(), top_n);
            SeriesBuilder::new(names(&top), colors)
                .dataset(RATINGS_LABEL, ratings(&top))
                .finish()
        }
        ViewRequest::TopInstalls => {
            let top = top_n_truncated(filtered.iter().copied(), top_n);
            SeriesBuilder::new(names(&top), colors)
                .dataset(INSTALLS_LABEL, installs(&top))
                .finish()
        }
        ViewRequest::MostRatedDeduped => {
            let top = most_rated_deduped(filtered.iter().copied(), top_n);
            let by_type = top.iter().map(|r| type_color(&r.app_type)).collect();
            SeriesBuilder::new(names(&top), colors)
                .dataset_with_colors(REVIEWS_LABEL, reviews(&top), by_type)
                .finish()
        }
        ViewRequest::InstallsByCategory => {
            let (labels, values): (Vec<String>, Vec<f64>) = installs_by_category(all)
                .into_iter()
                .map(|(cat, total)| (cat, total as f64))
                .unzip();
            SeriesBuilder::new(labels, colors)
                .dataset(CATEGORY_INSTALLS_LABEL, values)
                .finish()
        }
        ViewRequest::RatingHistogram => {
            let labels = RATING_BINS.iter().map(|b| b.to_string()).collect();
            let values = rating_histogram(filtered.iter().copied())
                .iter()
                .map(|&c| c as f64)
                .collect();
            SeriesBuilder::new(labels, colors)
                .dataset(RATING_HISTOGRAM_LABEL, values)
                .finish()
        }
        ViewRequest::ContentRatingDistribution => {
            let (labels, values): (Vec<String>, Vec<f64>) = content_rating_distribution(all)
                .into_iter()
                .map(|(rating, count)| (rating, count as f64))
                .unzip();
            SeriesBuilder::new(labels, colors)
                .dataset(CONTENT_RATINGS_LABEL, values)
                .finish()
        }
        ViewRequest::SizeVsInstalls => {
            let points = size_vs_installs(filtered.iter().copied(), top_n);
            let labels = points.iter().map(|p| p.name.clone()).collect();
            let sizes = points.iter().map(|p| p.size_mb).collect();
            let install_counts = points.iter().map(|p| p.install_count as f64).collect();
            SeriesBuilder::new(labels, colors)
                .dataset(SIZE_LABEL, sizes)
                .dataset(CATEGORY_INSTALLS_LABEL, install_counts)
                .finish()
        }
        ViewRequest::UpdatesByCategory => {
            let updates = updates_by_category(all);
            let labels = updates.iter().map(|u| u.category.clone()).collect();
            let counts = updates.iter().map(|u| u.count as f64).collect();
            let builder = SeriesBuilder::new(labels, colors).dataset(UPDATES_LABEL, counts);
            match update_lag_days(&updates) {
                Some(lag) => builder.dataset(UPDATE_LAG_LABEL, lag).finish(),
                None => builder.finish(),
            }
        }
    }
}

/// Days between each category's latest update and the newest update overall.
///
/// `None` unless every category has at least one dated record.
fn update_lag_days(updates: &[CategoryUpdates]) -> Option<Vec<f64>> {
    let dates: Vec<NaiveDate> = updates.iter().map(|u| u.last_updated).collect::<Option<_>>()?;
    let newest = dates.iter().max()?;
    Some(
        dates
            .iter()
            .map(|d| (*newest - *d).num_days() as f64)
            .collect(),
    )
}

fn reviews(records: &[&AppRecord]) -> Vec<f64> {
    records.iter().map(|r| r.review_count as f64).collect()
}

fn ratings(records: &[&AppRecord]) -> Vec<f64> {
    records.iter().map(|r| r.rating_or_zero()).collect()
}

fn installs(records: &[&AppRecord]) -> Vec<f64> {
    records.iter().map(|r| r.install_count as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{CyclicPalette, DEFAULT_PALETTE};
    use crate::data::model::RawAppRecord;

    fn dataset() -> AppDataset {
        let row = |app: &str, cat: &str, reviews: &str, app_type: &str| RawAppRecord {
            app: Some(app.into()),
            category: Some(cat.into()),
            reviews: Some(reviews.into()),
            installs: Some("1,000+".into()),
            rating: Some("4.0".into()),
            app_type: Some(app_type.into()),
            content_rating: Some("Everyone".into()),
            ..Default::default()
        };
        AppDataset::from_raw(&[
            row("A", "GAME", "10", "Free"),
            row("B", "TOOLS", "30", "Paid"),
            row("C", "GAME", "20", "Free"),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert_eq!(
            "Heatmap".parse::<ViewRequest>().unwrap_err(),
            ConfigurationError::UnknownView("Heatmap".into())
        );
        for view in ViewRequest::ALL {
            assert_eq!(view.name().parse::<ViewRequest>().unwrap(), view);
        }
    }

    #[test]
    fn overview_has_three_datasets() {
        let ds = dataset();
        let mut palette = CyclicPalette::default();
        let series = build_series(
            &ds,
            &FilterSelection::default(),
            ViewRequest::Overview,
            2,
            &mut palette,
        )
        .unwrap();
        assert_eq!(series.labels, vec!["A", "B"]);
        let labels: Vec<_> = series.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec![REVIEWS_LABEL, RATINGS_LABEL, INSTALLS_LABEL]);
        assert_eq!(series.datasets[0].values, vec![10.0, 30.0]);
        assert_eq!(series.datasets[1].values, vec![4.0, 4.0]);
        assert_eq!(series.datasets[0].colors, DEFAULT_PALETTE[..2].to_vec());
    }

    #[test]
    fn category_views_ignore_selection() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("GAME", "All", "All", "All").unwrap();
        let series = build_series(
            &ds,
            &sel,
            ViewRequest::InstallsByCategory,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap();
        assert_eq!(series.labels, vec!["GAME", "TOOLS"]);
        assert_eq!(series.datasets[0].values, vec![2000.0, 1000.0]);
        assert!(!ViewRequest::InstallsByCategory.uses_selection());
    }

    #[test]
    fn most_rated_colours_by_type() {
        let ds = dataset();
        let series = build_series(
            &ds,
            &FilterSelection::default(),
            ViewRequest::MostRatedDeduped,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap();
        assert_eq!(series.labels, vec!["B", "C", "A"]);
        let colors = &series.datasets[0].colors;
        assert_eq!(colors[0], type_color("Paid"));
        assert_eq!(colors[1], type_color("Free"));
    }

    #[test]
    fn histogram_has_five_bins() {
        let ds = dataset();
        let series = build_series(
            &ds,
            &FilterSelection::default(),
            ViewRequest::RatingHistogram,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap();
        assert_eq!(series.labels, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(series.datasets[0].values, vec![0.0, 0.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn unknown_filter_value_is_a_pipeline_error() {
        let ds = dataset();
        let sel = FilterSelection::from_labels("GAMEZ", "All", "All", "All").unwrap();
        let err = build_series(
            &ds,
            &sel,
            ViewRequest::TopReviews,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Configuration(ConfigurationError::UnknownCategory("GAMEZ".into()))
        );
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let ds = dataset();
        let err = build_series(
            &ds,
            &FilterSelection::default(),
            ViewRequest::Overview,
            0,
            &mut CyclicPalette::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Configuration(ConfigurationError::InvalidTopN(0))
        );
    }

    #[test]
    fn updates_carry_days_behind_latest() {
        let row = |cat: &str, date: &str| RawAppRecord {
            app: Some("X".into()),
            category: Some(cat.into()),
            last_updated: Some(date.into()),
            ..Default::default()
        };
        let ds = AppDataset::from_raw(&[
            row("GAME", "January 7, 2018"),
            row("TOOLS", "January 1, 2018"),
            row("GAME", "January 10, 2018"),
        ])
        .unwrap();
        let series = build_series(
            &ds,
            &FilterSelection::default(),
            ViewRequest::UpdatesByCategory,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap();
        assert_eq!(series.labels, vec!["GAME", "TOOLS"]);
        assert_eq!(series.dataset(UPDATES_LABEL).unwrap().values, vec![2.0, 1.0]);
        assert_eq!(series.dataset(UPDATE_LAG_LABEL).unwrap().values, vec![0.0, 9.0]);
    }

    #[test]
    fn updates_without_dates_only_count() {
        let series = build_series(
            &dataset(),
            &FilterSelection::default(),
            ViewRequest::UpdatesByCategory,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap();
        assert_eq!(series.datasets.len(), 1);
        assert_eq!(series.datasets[0].values, vec![2.0, 1.0]);
    }

    #[test]
    fn series_serializes_for_renderers() {
        let ds = dataset();
        let series = build_series(
            &ds,
            &FilterSelection::default(),
            ViewRequest::ContentRatingDistribution,
            10,
            &mut CyclicPalette::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["labels"][0], "Everyone");
        assert_eq!(json["datasets"][0]["values"][0], 3.0);
    }
}
