//! Failure taxonomy shared by the client, the service and the controllers.
//!
//! # Design
//! Every failure is recoverable at the screen boundary: a controller stores
//! the `ApiError` in `RequestState::Failed` and the presentation layer
//! decides how to tell the user. The type is `Clone` so it can live in that
//! state and still be returned to the caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request could not be sent or the response never arrived.
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status or an `error` payload.
    #[error("server failure ({status}): {message}")]
    Server { status: u16, message: String },

    /// The response body was not the JSON shape the endpoint documents.
    #[error("malformed response: {0}")]
    Parse(String),

    /// Camera or gallery access was refused. Raised by the presentation
    /// layer; the core never produces it on its own.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The selected image could not be read from local storage.
    #[error("image unreadable: {0}")]
    Image(String),
}

impl ApiError {
    /// True for a 404 from the backend, e.g. deleting an unknown uid.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }
}
