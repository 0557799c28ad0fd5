use thiserror::Error;

use promq_model::{FormParams, ModelError};

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure, or a body that is not a JSON object.
    TransportFormat,
    /// The server answered with an `errorType`/`error` envelope.
    ServerReported,
    /// HTTP status >= 400 without an error envelope.
    HttpStatus,
    /// A request of a batched call failed; the cause is attached.
    GenericDispatch,
    /// The call was rejected before anything was sent.
    InvalidRequest,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid request: {0}")]
    Model(#[from] ModelError),

    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[cfg(feature = "blocking")]
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("client ({url}) returned unsupported response: {body}")]
    UnsupportedResponse {
        url: String,
        status: u16,
        body: String,
    },

    #[error("client ({url}) returned non-object response: {body}")]
    NonObjectResponse {
        url: String,
        status: u16,
        body: String,
    },

    #[error("client ({url}) returned malformed response: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("client ({url}) returned error type: {error_type}, error: {error}")]
    Server {
        url: String,
        status: u16,
        error_type: String,
        error: String,
    },

    #[error("client ({url}) returned error with status code: {status}, message: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("error getting response for {request}: {source}")]
    Dispatch {
        request: FormParams,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidRequest(_) | ApiError::Model(_) | ApiError::ClientBuild(_) => {
                ErrorKind::InvalidRequest
            }
            #[cfg(feature = "blocking")]
            ApiError::Runtime(_) => ErrorKind::InvalidRequest,
            ApiError::Transport { .. }
            | ApiError::UnsupportedResponse { .. }
            | ApiError::NonObjectResponse { .. }
            | ApiError::MalformedResponse { .. } => ErrorKind::TransportFormat,
            ApiError::Server { .. } => ErrorKind::ServerReported,
            ApiError::Status { .. } => ErrorKind::HttpStatus,
            ApiError::Dispatch { .. } => ErrorKind::GenericDispatch,
        }
    }

    /// The classified error behind a batch dispatch failure, or `self`.
    pub fn root_cause(&self) -> &ApiError {
        match self {
            ApiError::Dispatch { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Parameters of the failed request, for errors raised by batched calls.
    pub fn request(&self) -> Option<&FormParams> {
        match self {
            ApiError::Dispatch { request, .. } => Some(request),
            _ => None,
        }
    }

    /// HTTP status of the response the error was derived from.
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            ApiError::Server { status, .. }
            | ApiError::Status { status, .. }
            | ApiError::UnsupportedResponse { status, .. }
            | ApiError::NonObjectResponse { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Endpoint URL the failing request was sent to.
    pub fn url(&self) -> Option<&str> {
        match self.root_cause() {
            ApiError::Transport { url, .. }
            | ApiError::UnsupportedResponse { url, .. }
            | ApiError::NonObjectResponse { url, .. }
            | ApiError::MalformedResponse { url, .. }
            | ApiError::Server { url, .. }
            | ApiError::Status { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Returns `true` if the request hit the configured timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self.root_cause(), ApiError::Transport { source, .. } if source.is_timeout())
    }
}
