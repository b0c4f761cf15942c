//! Logger errors

use lumber_config::ConfigError;
use lumber_sinks::SinkError;
use thiserror::Error;

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, LumberError>;

/// Errors from building, flushing or closing a logger
///
/// Log calls themselves never return errors.
#[derive(Debug, Error)]
pub enum LumberError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{sink} sink failed: {source}")]
    Sink {
        sink: &'static str,
        #[source]
        source: SinkError,
    },
}

impl LumberError {
    pub fn sink(sink: &'static str, source: SinkError) -> Self {
        Self::Sink { sink, source }
    }
}
