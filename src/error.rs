use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// The dataset handed to the pipeline is unusable as a whole.
///
/// Malformed individual fields never show up here; the normalizer recovers
/// those locally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("dataset contains no records")]
    EmptyDataset,

    #[error("expected a top-level array of records, found {0}")]
    NotAnArray(String),
}

/// A caller asked for a view, filter value or setting the pipeline does not know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("unknown view: {0:?}")]
    UnknownView(String),

    #[error("unknown size bucket: {0:?} (expected All, Small, Medium or Large)")]
    UnknownSizeBucket(String),

    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    #[error("unknown genre: {0:?}")]
    UnknownGenre(String),

    #[error("unknown content rating: {0:?}")]
    UnknownContentRating(String),

    #[error("unknown chart kind: {0:?}")]
    UnknownChartKind(String),

    #[error("top_n must be at least 1, got {0}")]
    InvalidTopN(usize),
}

/// Any error the pipeline can hand back to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
