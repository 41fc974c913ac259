use thiserror::Error;

/// Failure of a single catalog document request.
///
/// Cancellation is not represented here: a cancelled request never produces
/// a value of this type.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("JSON decode error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// `true` for a 404, which consumers treat as a redirect condition rather
    /// than a transient failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::NotFound { .. } => Some(404),
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::Network(err) => err.status().map(|s| s.as_u16()),
            FetchError::Decode { .. } | FetchError::InvalidUrl { .. } => None,
        }
    }
}

/// Why one entry of a catalog document was dropped during normalization.
///
/// These never abort normalization; the offending entry is logged and
/// skipped while its siblings are kept.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("{entry} is missing required field `{field}`")]
    MissingField { entry: String, field: &'static str },

    #[error("category {category} nests deeper than {max_depth} levels")]
    UnsupportedNesting { category: String, max_depth: usize },

    #[error("{entry} does not match the expected shape: {source}")]
    Malformed {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate restaurant id {id}")]
    DuplicateId { id: String },
}
