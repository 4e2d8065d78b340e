use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use roundtrip::RetryPolicy;
use roundtrip_core::{DEFAULT_CACHE_KEY, FixedKey, KeyExtractor, MethodUri};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One decorator in the chain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub enum LayerConfig {
    /// Sets the `Authorization` header.
    BasicAuth(BasicAuth),
    /// Re-sends failed requests.
    Retry(RetryPolicy),
    /// Writes one line per request.
    Logging(Logging),
    /// Replays stored responses.
    Cache(Cache),
}

#[derive(Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Logging {
    #[serde(default)]
    pub sink: Sink,
}

/// Where the logging layer writes.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum Sink {
    #[default]
    Stdout,
    Stderr,
    /// Appends to a file, creating it if needed.
    File { path: PathBuf },
}

impl Sink {
    pub fn into_writer(self) -> Result<Box<dyn Write + Send>, ConfigError> {
        match self {
            Sink::Stdout => Ok(Box::new(io::stdout())),
            Sink::Stderr => Ok(Box::new(io::stderr())),
            Sink::File { path } => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .map_err(|source| ConfigError::Sink { path, source })?;
                Ok(Box::new(file))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Cache {
    #[serde(default)]
    pub key: Key,
}

/// Cache slot selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub enum Key {
    /// Every request uses the named slot.
    Fixed(String),
    /// One slot per method and URI.
    MethodUri,
}

impl Default for Key {
    fn default() -> Self {
        Key::Fixed(DEFAULT_CACHE_KEY.to_owned())
    }
}

impl Key {
    pub fn into_extractor(self) -> Box<dyn KeyExtractor> {
        match self {
            Key::Fixed(key) => Box::new(FixedKey::new(key)),
            Key::MethodUri => Box::new(MethodUri),
        }
    }
}
