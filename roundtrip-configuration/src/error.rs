use std::io;
use std::path::PathBuf;

use http::header::InvalidHeaderValue;
use thiserror::Error;

/// Errors raised while reading or applying a pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The YAML document does not describe a pipeline.
    #[error("invalid pipeline configuration: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    /// Basic auth credentials cannot be sent as a header.
    #[error("invalid basic auth credentials: {0}")]
    Credentials(#[from] InvalidHeaderValue),

    /// A log file could not be opened.
    #[error("cannot open log file {}: {source}", path.display())]
    Sink {
        /// The configured path.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },
}
