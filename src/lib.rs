//! Query pipeline behind the Play Store dashboard.
//!
//! Raw catalog rows are normalized once into an [`AppDataset`], then every
//! filter or view change runs [`build_series`] to get a fresh [`ChartSeries`].

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use color::{ColorMode, ColorScheme, Rgba};
pub use config::DashboardConfig;
pub use data::filter::{filter_records, filtered_indices, FilterSelection, Selection, SizeBucket};
pub use data::model::{AppDataset, AppRecord, RawAppRecord};
pub use data::view::{build_series, ChartSeries, SeriesDataset, ViewRequest};
pub use error::{ConfigurationError, InputError, PipelineError};
