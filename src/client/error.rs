use std::error::Error as StdError;

use crate::domain::{ChunkResponse, ErrorKind, ValidationError};

use super::{BoxError, HttpResponse};

#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}{}", partial_delivery_note(.chunks_delivered))]
/// Errors returned by [`FreeMobileClient`](super::FreeMobileClient).
///
/// Every failure carries one [`ErrorKind`], a human-readable message, and, for
/// gateway responses, the raw HTTP status. When a multi-chunk message fails
/// half-way, [`FreeMobileError::chunks_delivered`] tells how many chunks the
/// gateway had already accepted; those are not retracted.
pub struct FreeMobileError {
    kind: ErrorKind,
    status: Option<u16>,
    body: Option<String>,
    message: String,
    chunks_delivered: usize,
    #[source]
    source: Option<BoxError>,
}

fn partial_delivery_note(chunks_delivered: &usize) -> String {
    match chunks_delivered {
        0 => String::new(),
        1 => " (1 chunk already delivered)".to_owned(),
        n => format!(" ({n} chunks already delivered)"),
    }
}

impl FreeMobileError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            body: None,
            message: message.into(),
            chunks_delivered: 0,
            source: None,
        }
    }

    /// Failure for a gateway response with a non-2xx status.
    pub(crate) fn http_status(status: u16, body: String, chunks_delivered: usize) -> Self {
        let kind = ErrorKind::from_http_status(status).unwrap_or(ErrorKind::HttpError);
        let message = match kind {
            ErrorKind::HttpError => format!("{} {status}", kind.description()),
            _ => kind.description().to_owned(),
        };
        let body = if body.trim().is_empty() {
            None
        } else {
            Some(body)
        };
        Self {
            status: Some(status),
            body,
            chunks_delivered,
            ..Self::new(kind, message)
        }
    }

    /// Failure for a gateway call that produced no HTTP response.
    pub(crate) fn network(source: BoxError, chunks_delivered: usize) -> Self {
        let kind = ErrorKind::NetworkError;
        Self {
            message: format!("{}: {source}", kind.description()),
            chunks_delivered,
            source: Some(source),
            ..Self::new(kind, String::new())
        }
    }

    /// Failure to create the HTTP client; happens before any gateway call.
    pub(crate) fn client_setup(source: BoxError) -> Self {
        Self {
            message: format!("failed to set up the HTTP client: {source}"),
            source: Some(source),
            ..Self::new(ErrorKind::NetworkError, String::new())
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status returned by the gateway, when there was a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Non-blank response body returned with a failing status.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Chunks of the message accepted by the gateway before this failure.
    pub fn chunks_delivered(&self) -> usize {
        self.chunks_delivered
    }

    /// Whether part of the message reached the gateway before the failure.
    pub fn is_partial_delivery(&self) -> bool {
        self.chunks_delivered > 0
    }

    /// Underlying transport error for [`ErrorKind::NetworkError`].
    pub fn transport_source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}

impl From<ValidationError> for FreeMobileError {
    fn from(err: ValidationError) -> Self {
        let kind = err.kind();
        Self::new(kind, err.to_string())
    }
}

/// Map the outcome of one gateway call to a delivered chunk or a classified failure.
///
/// `chunks_delivered` is the number of earlier chunks of the same message that
/// already succeeded; it is recorded on the error.
pub(crate) fn classify_outcome(
    outcome: Result<HttpResponse, BoxError>,
    chunks_delivered: usize,
) -> Result<ChunkResponse, FreeMobileError> {
    let response = outcome.map_err(|err| FreeMobileError::network(err, chunks_delivered))?;
    if ErrorKind::from_http_status(response.status).is_some() {
        return Err(FreeMobileError::http_status(
            response.status,
            response.body,
            chunks_delivered,
        ));
    }
    Ok(ChunkResponse {
        status: response.status,
        body: response.body,
    })
}
