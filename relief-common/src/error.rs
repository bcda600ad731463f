use thiserror::Error;

/// Top-level error taxonomy for the relief workspace.
///
/// Most of these variants are *degraded-path* markers: the pipeline catches
/// them at a single adapter/route boundary and absorbs them into a
/// provenance-tagged fallback rather than letting them propagate. Only
/// [`ReliefError::NoOrigin`] and [`ReliefError::ResourceExhausted`] are meant
/// to short-circuit a whole query.
#[derive(Error, Debug)]
pub enum ReliefError {
    #[error("could not resolve an origin location from the query")]
    NoOrigin,

    #[error("source adapter '{0}' unavailable: {1}")]
    AdapterUnavailable(String, String),

    #[error("extractor unavailable: {0}")]
    ExtractorUnavailable(String),

    #[error("external router unavailable: {0}")]
    RouterUnavailable(String),

    #[error("no route could be found between the requested points")]
    NoPath,

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("resource exhausted: too many in-flight queries")]
    ResourceExhausted,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ReliefError>;
