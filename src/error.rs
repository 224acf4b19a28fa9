use thiserror::Error;

/// Failures of a single paginated listing fetch. Any of these aborts the
/// whole listing; no partial result is handed back.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading response body from {url} failed")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("http {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("invalid json from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("page {url} is missing its data list")]
    MalformedPage { url: String },
    #[error("provider repeated an earlier page link: {url}")]
    PaginationLoop { url: String },
    #[error("fetch cancelled")]
    Cancelled,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProgressError {
    #[error("operation {0:?} is already registered")]
    DuplicateOperation(String),
    #[error("operation {name:?} has invalid weight {weight}")]
    InvalidWeight { name: String, weight: f64 },
    #[error("cannot register {0:?} after progress has started")]
    AlreadyStarted(String),
}
