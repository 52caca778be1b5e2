use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Closed set of failure categories reported by this crate.
///
/// Kinds fall into three groups:
/// - construction-time credential checks ([`ErrorKind::is_validation`]),
/// - pre-flight message checks made before any network call ([`ErrorKind::is_preflight`]),
/// - outcomes of a failed gateway call ([`ErrorKind::is_transport`]).
pub enum ErrorKind {
    /// The credentials value is not a structured object.
    InvalidCredentials,
    /// `user` is missing, empty, or not a string.
    InvalidUser,
    /// `pass` is missing, empty, or not a string.
    InvalidPass,
    /// The message is not a string.
    InvalidMessageType,
    /// The sanitized message is empty or whitespace-only.
    EmptyMessage,
    /// HTTP 400: missing or incorrect parameters.
    BadRequest,
    /// HTTP 402: too many messages sent in too little time.
    RateLimited,
    /// HTTP 403: wrong credentials or the SMS notification option is disabled.
    AccessDenied,
    /// HTTP 500: failure on the gateway side.
    ServerError,
    /// Any other non-2xx HTTP status.
    HttpError,
    /// No HTTP response at all (connection, DNS, TLS, timeout).
    NetworkError,
}

impl ErrorKind {
    /// Map an HTTP status to a failure kind.
    ///
    /// Returns `None` for `2xx` statuses, which the gateway uses for success.
    pub fn from_http_status(status: u16) -> Option<Self> {
        Some(match status {
            200..=299 => return None,
            400 => Self::BadRequest,
            402 => Self::RateLimited,
            403 => Self::AccessDenied,
            500 => Self::ServerError,
            _ => Self::HttpError,
        })
    }

    /// Stable upper-case name of the kind, e.g. `ACCESS_DENIED`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidUser => "INVALID_USER",
            Self::InvalidPass => "INVALID_PASS",
            Self::InvalidMessageType => "INVALID_MESSAGE_TYPE",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::BadRequest => "BAD_REQUEST",
            Self::RateLimited => "RATE_LIMITED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::ServerError => "SERVER_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
        }
    }

    /// Whether this kind is raised while validating credentials.
    pub fn is_validation(self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::InvalidUser | Self::InvalidPass
        )
    }

    /// Whether this kind is raised before any network call for a message.
    pub fn is_preflight(self) -> bool {
        matches!(self, Self::InvalidMessageType | Self::EmptyMessage)
    }

    /// Whether this kind comes from a failed gateway call.
    pub fn is_transport(self) -> bool {
        !self.is_validation() && !self.is_preflight()
    }

    /// Human-readable description used as the default error message.
    pub fn description(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "credentials must be an object with user and pass",
            Self::InvalidUser => "user must be a non-empty string",
            Self::InvalidPass => "pass must be a non-empty string",
            Self::InvalidMessageType => "message must be a string",
            Self::EmptyMessage => "cannot send an empty message",
            Self::BadRequest => "missing or incorrect parameters",
            Self::RateLimited => "too many messages sent in too little time",
            Self::AccessDenied => "access denied: check credentials and that SMS notifications are enabled",
            Self::ServerError => "gateway server error",
            Self::HttpError => "unexpected HTTP status",
            Self::NetworkError => "no response from the gateway",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
