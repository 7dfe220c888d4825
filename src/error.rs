use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamsError>;

/// Coarse classification the orchestrator uses to decide whether a failure
/// aborts the whole lookup or only the source it happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller supplied something unusable. Never retried, never aggregated.
    Configuration,
    /// One base URL could not be used (network, missing file, bad document).
    Source,
    /// Signature missing or invalid under a mandatory signing policy.
    Trust,
    /// The caller's deadline elapsed.
    Cancelled,
}

#[derive(Debug, Error)]
pub enum StreamsError {
    #[error("unknown series {0:?}")]
    UnknownSeries(String),

    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    #[error("invalid trusted key {id:?}: {reason}")]
    InvalidKey { id: String, reason: String },

    #[error("{url} not found")]
    NotFound { url: String },

    #[error("cannot fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("cannot parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no index entry in {url} provides {data_type:?} metadata")]
    NoMatchingIndex { url: String, data_type: String },

    #[error("{url} uses unsupported format {found:?} (expected {expected:?})")]
    UnsupportedFormat {
        url: String,
        found: String,
        expected: &'static str,
    },

    #[error("signature for {url} is missing")]
    SignatureMissing { url: String },

    #[error("signature for {url} is invalid: {reason}")]
    SignatureInvalid { url: String, reason: String },

    #[error("no metadata found: {0}")]
    AllSourcesFailed(SourceFailures),

    #[error("metadata lookup cancelled after {0:?}")]
    Cancelled(Duration),
}

impl StreamsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamsError::UnknownSeries(_)
            | StreamsError::InvalidConstraint(_)
            | StreamsError::InvalidKey { .. } => ErrorKind::Configuration,
            StreamsError::SignatureMissing { .. } | StreamsError::SignatureInvalid { .. } => {
                ErrorKind::Trust
            }
            StreamsError::Cancelled(_) => ErrorKind::Cancelled,
            StreamsError::NotFound { .. }
            | StreamsError::Fetch { .. }
            | StreamsError::Parse { .. }
            | StreamsError::NoMatchingIndex { .. }
            | StreamsError::UnsupportedFormat { .. }
            | StreamsError::AllSourcesFailed(_) => ErrorKind::Source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StreamsError::NotFound { .. })
    }

    /// Per-source failures carried by [`StreamsError::AllSourcesFailed`].
    pub fn source_failures(&self) -> &[SourceFailure] {
        match self {
            StreamsError::AllSourcesFailed(failures) => failures.as_slice(),
            _ => &[],
        }
    }
}

/// A base URL that was skipped and the reason why.
#[derive(Debug)]
pub struct SourceFailure {
    base_url: String,
    error: StreamsError,
}

impl SourceFailure {
    pub fn new(base_url: impl Into<String>, error: StreamsError) -> Self {
        Self {
            base_url: base_url.into(),
            error,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn error(&self) -> &StreamsError {
        &self.error
    }
}

#[derive(Debug, Default)]
pub struct SourceFailures(Vec<SourceFailure>);

impl SourceFailures {
    pub fn new(failures: Vec<SourceFailure>) -> Self {
        Self(failures)
    }

    pub fn as_slice(&self) -> &[SourceFailure] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SourceFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no metadata sources were supplied");
        }
        write!(f, "all {} source(s) failed", self.0.len())?;
        for failure in &self.0 {
            write!(f, "\n  - {}: {}", failure.base_url, failure.error)?;
        }
        Ok(())
    }
}
