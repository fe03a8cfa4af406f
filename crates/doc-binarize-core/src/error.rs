/// Reasons an input grid is rejected before any pixel is processed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("image is empty (width={width}, height={height})")]
    Empty { width: usize, height: usize },

    #[error("row {row} has {got} samples, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("buffer length mismatch (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("unsupported channel count {0} (expected 1 or 3)")]
    UnsupportedChannels(usize),
}

/// Parameter values outside the accepted domain, checked after normalization.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("block size {requested} is too small (normalized to {normalized}, minimum is 3)")]
    BlockSizeTooSmall { requested: usize, normalized: usize },

    #[error("block size {requested} exceeds the maximum of {max}")]
    BlockSizeTooLarge { requested: usize, max: usize },

    #[error("sensitivity must be finite, got {0}")]
    NonFiniteSensitivity(f32),

    #[error("gaussian sigma must be finite and positive, got {0}")]
    InvalidSigma(f32),

    #[error("blur kernel size {requested} is too small (normalized to {normalized}, minimum is 3)")]
    BlurSizeTooSmall { requested: usize, normalized: usize },
}

/// Errors returned by the thresholding core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("invalid image shape: {0}")]
    InvalidImageShape(#[from] ShapeError),

    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),
}
