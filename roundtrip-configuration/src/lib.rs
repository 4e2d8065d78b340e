//! # roundtrip-configuration
//!
//! Describes a transport pipeline in YAML and assembles it at runtime.
//!
//! ```
//! use roundtrip_configuration::{LayerConfig, PipelineConfig};
//!
//! let config = PipelineConfig::from_yaml(r#"
//! layers:
//!   - BasicAuth: { user: bob, password: pwd }
//!   - Retry: { max_retries: 3, delay: 1s }
//!   - Logging: { sink: Stderr }
//!   - Cache: { key: { Fixed: resp } }
//! store:
//!   type: Memory
//! "#).unwrap();
//!
//! assert_eq!(config.layers.len(), 4);
//! assert!(matches!(config.layers[1], LayerConfig::Retry(_)));
//! ```
//!
//! Layers are listed from the caller inwards, the same order as
//! [`Pipeline`](roundtrip::Pipeline). Every `Cache` layer uses the one store
//! described under `store`.

use std::sync::Arc;

use roundtrip::{
    BasicAuthTransport, CacheTransport, Credentials, LoggingTransport, RetryTransport,
};
use roundtrip_core::{BoxTransport, Transport};
use roundtrip_store::CacheStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod error;
pub mod layer;
mod store;

pub use error::ConfigError;
pub use layer::{BasicAuth, Cache, Key, LayerConfig, Logging, Sink};
pub use store::StoreConfig;

/// A pipeline: decorators from the caller inwards and the cache store.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    #[serde(default)]
    pub store: StoreConfig,
}

impl PipelineConfig {
    /// Parses a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_saphyr::from_str(yaml)?)
    }

    /// Wraps `base` in the configured layers, using a fresh store.
    pub fn into_transport<T>(self, base: T) -> Result<BoxTransport, ConfigError>
    where
        T: Transport + 'static,
    {
        let store = self.store.clone().into_store();
        self.into_transport_with_store(base, store)
    }

    /// Wraps `base` in the configured layers, caching into `store`.
    ///
    /// The `store` section of the configuration is ignored.
    pub fn into_transport_with_store<T>(
        self,
        base: T,
        store: Arc<dyn CacheStore>,
    ) -> Result<BoxTransport, ConfigError>
    where
        T: Transport + 'static,
    {
        let mut transport: BoxTransport = Arc::new(base);

        // Innermost first.
        for layer in self.layers.into_iter().rev() {
            debug!(?layer, "adding layer");
            match layer {
                LayerConfig::BasicAuth(auth) => {
                    let credentials = Credentials::new(auth.user, auth.password)?;
                    transport = Arc::new(BasicAuthTransport::new(transport, credentials));
                }
                LayerConfig::Retry(policy) => {
                    transport = Arc::new(RetryTransport::new(transport, policy));
                }
                LayerConfig::Logging(logging) => {
                    let sink = logging.sink.into_writer()?;
                    transport = Arc::new(LoggingTransport::new(transport, sink));
                }
                LayerConfig::Cache(cache) => {
                    let key = cache.key.into_extractor();
                    transport =
                        Arc::new(CacheTransport::new(transport, Arc::clone(&store)).with_key(key));
                }
            }
        }

        Ok(transport)
    }
}
