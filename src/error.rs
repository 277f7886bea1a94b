use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Normalization errors
// ---------------------------------------------------------------------------

/// Errors raised while turning intensities into alpha values.
///
/// All of these are detected before any division happens, so a bad window
/// never turns into `NaN` alphas.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    #[error("no intensities inside the {min_nm:?}..{max_nm:?} nm window")]
    EmptyWindow {
        min_nm: Option<f64>,
        max_nm: Option<f64>,
    },

    #[error("percentile {0} is outside 0..=100")]
    InvalidPercentile(f64),

    #[error("bottom percentile {bottom} is above top percentile {top}")]
    InvertedPercentiles { bottom: f64, top: f64 },

    /// The reference statistic used as a divisor is zero or not finite.
    #[error("{which} reference intensity is {value}, cannot normalize against it")]
    ZeroDivisor { which: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Aggregation errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum AggregateError {
    #[error("aggregation step must be a positive whole number of 0.01 nm, got {0}")]
    InvalidStep(f64),

    /// Lowest and highest wavelengths are too far apart to walk step by step.
    #[error("{lowest_nm} to {highest_nm} nm spans {buckets} buckets, too many to draw")]
    SpanTooLarge {
        lowest_nm: f64,
        highest_nm: f64,
        buckets: i128,
    },
}

// ---------------------------------------------------------------------------
// Rendering errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("font file {} not found", .0.display())]
    MissingFont(PathBuf),

    #[error("font file {} holds no usable face", .0.display())]
    UnusableFont(PathBuf),

    #[error("nothing to draw: the aggregated sequence is empty")]
    EmptyFrame,

    #[error("canvas of {width}x{height} px cannot be allocated")]
    Canvas { width: u32, height: u32 },

    #[error("generated SVG could not be parsed: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Anything that stops a table from becoming a frame.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}
