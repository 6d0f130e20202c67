//! Error types for cell data.

use thiserror::Error;

/// Data that is present but shaped incorrectly for its kind.
///
/// Renderers never propagate this out of a draw call; they paint an error
/// glyph for the one bad cell and keep the frame going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellDataError {
    /// Number cell holding NaN or an infinity.
    #[error("number cell holds non-finite value {0}")]
    NonFiniteNumber(f64),

    /// Gauge configured with a maximum that can't scale a value.
    #[error("gauge max value must be positive, got {0}")]
    InvalidGaugeMax(f64),

    /// Chart values and labels disagree in length.
    #[error("chart has {values} values but {labels} labels")]
    ChartSeriesMismatch { values: usize, labels: usize },

    /// Chart point that can't be plotted.
    #[error("chart point {index} is not finite")]
    NonFiniteChartPoint { index: usize },

    /// Rating cell with a zero-length scale.
    #[error("rating scale must be at least 1")]
    ZeroRatingScale,

    /// Rating scale too long to lay out as a row of icons.
    #[error("rating scale {max} exceeds {limit}")]
    RatingScaleTooLarge { max: u32, limit: u32 },

    /// Rating value that is negative or not finite.
    #[error("invalid rating value {0}")]
    InvalidRating(f64),

    /// Image descriptor without a URL.
    #[error("image {id} has an empty url")]
    EmptyImageUrl { id: String },
}
