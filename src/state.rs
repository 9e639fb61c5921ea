use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::color::ColorScheme;
use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, FilterSelection, Selection, SizeBucket};
use crate::data::model::{AppDataset, AppRecord};
use crate::data::view::{series_for, ChartSeries, ViewRequest};
use crate::error::ConfigurationError;

// ---------------------------------------------------------------------------
// Chart kind – how the viewer draws a series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Scatter];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|k| k.label() == s)
            .ok_or_else(|| ConfigurationError::UnknownChartKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Renderers pull [`DashboardState::series`] after any change; every setter
/// recomputes the visible rows and the series.
pub struct DashboardState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<AppDataset>,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Which chart the user asked for.
    pub view: ViewRequest,

    /// How the chart is drawn.
    pub chart_kind: ChartKind,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Series for the current view (None without a dataset).
    pub series: Option<ChartSeries>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    top_n: usize,
    colors: Box<dyn ColorScheme>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(&DashboardConfig::default())
    }
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            view: ViewRequest::Overview,
            chart_kind: ChartKind::default(),
            visible_indices: Vec::new(),
            series: None,
            status_message: None,
            top_n: config.top_n.max(1),
            colors: config.color_mode.scheme(),
        }
    }

    /// Ingest a newly loaded dataset and reset filters.
    pub fn set_dataset(&mut self, dataset: AppDataset) {
        self.selection = FilterSelection::default();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh();
    }

    /// Load a dataset from disk; failures end up in `status_message`.
    pub fn load_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute `visible_indices` and `series` after any change.
    pub fn refresh(&mut self) {
        let Some(ds) = &self.dataset else {
            self.visible_indices.clear();
            self.series = None;
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.selection);
        let filtered: Vec<&AppRecord> =
            self.visible_indices.iter().map(|&i| &ds.records[i]).collect();
        let series = series_for(ds, &filtered, self.view, self.top_n, self.colors.as_mut());
        log::debug!(
            "{}: {} of {} apps visible, {} labels",
            self.view,
            filtered.len(),
            ds.len(),
            series.labels.len()
        );
        self.series = Some(series);
    }

    /// Records passing the current filters, in dataset order.
    pub fn visible_records(&self) -> impl Iterator<Item = &AppRecord> {
        let records = self.dataset.as_ref().map(|ds| ds.records.as_slice()).unwrap_or(&[]);
        self.visible_indices.iter().filter_map(move |&i| records.get(i))
    }

    pub fn set_category(&mut self, category: Selection<String>) {
        self.selection.category = category;
        self.refresh();
    }

    pub fn set_genre(&mut self, genre: Selection<String>) {
        self.selection.genre = genre;
        self.refresh();
    }

    pub fn set_size_bucket(&mut self, bucket: Selection<SizeBucket>) {
        self.selection.size_bucket = bucket;
        self.refresh();
    }

    pub fn set_content_rating(&mut self, rating: Selection<String>) {
        self.selection.content_rating = rating;
        self.refresh();
    }

    /// Reset every filter to `All`.
    pub fn clear_filters(&mut self) {
        self.selection = FilterSelection::default();
        self.refresh();
    }

    pub fn set_view(&mut self, view: ViewRequest) {
        self.view = view;
        self.refresh();
    }

    /// String form used by config files and tests; unknown names are rejected.
    pub fn set_view_by_name(&mut self, name: &str) -> Result<(), ConfigurationError> {
        let view = name.parse()?;
        self.set_view(view);
        Ok(())
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }
}
