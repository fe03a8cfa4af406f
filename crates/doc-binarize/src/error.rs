#[cfg(feature = "image")]
use std::path::PathBuf;

use crate::core::ThresholdError;

/// Errors produced by the facade helpers and the CLI.
#[derive(thiserror::Error, Debug)]
pub enum BinarizeError {
    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    #[cfg(feature = "image")]
    #[error("cannot load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[cfg(feature = "image")]
    #[error("cannot save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cannot write report: {0}")]
    Report(#[source] serde_json::Error),

    #[error("max_side must be at least 1")]
    InvalidMaxSide,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_and_config_errors_read_differently() {
        let json_err = || serde_json::from_str::<u8>("x").unwrap_err();
        assert!(BinarizeError::Config(json_err())
            .to_string()
            .starts_with("invalid config:"));
        assert!(BinarizeError::Report(json_err())
            .to_string()
            .starts_with("cannot write report:"));
    }
}
