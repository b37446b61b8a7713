//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the Daydeck engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The card dataset could not be fetched or parsed. Fatal to
    /// initialization; no partial corpus is ever accepted.
    #[error("failed to load card dataset: {0}")]
    DataLoad(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Selection was requested against a corpus with zero active cards.
    #[error("no active cards available for selection")]
    EmptyCorpus,

    /// A mutating store operation ran before the load phase completed.
    #[error("engagement store used before load() completed")]
    StoreNotLoaded,

    /// A record could not be encoded for persistence. Local to the
    /// engine; the backend was never reached.
    #[error("failed to encode record for persistence: {0}")]
    Encode(#[source] serde_json::Error),

    /// The persistence backend rejected a read or write.
    #[error("storage backend failure: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl EngineError {
    pub(crate) fn data_load<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DataLoad(Box::new(err))
    }

    pub(crate) fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}
