use std::fmt;

use crate::domain::kind::ErrorKind;
use crate::domain::value::{MessageText, Pass, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    Missing { field: &'static str },
    NotAString { field: &'static str },
    NotAnObject { field: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::NotAString { field } => write!(f, "{field} must be a string"),
            Self::NotAnObject { field } => write!(f, "{field} must be an object"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// The field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::Missing { field }
            | Self::NotAString { field }
            | Self::NotAnObject { field } => field,
        }
    }

    /// Failure kind reported for this validation error.
    pub fn kind(&self) -> ErrorKind {
        match (self, self.field()) {
            (_, User::FIELD) => ErrorKind::InvalidUser,
            (_, Pass::FIELD) => ErrorKind::InvalidPass,
            (Self::Empty { .. }, MessageText::FIELD) => ErrorKind::EmptyMessage,
            (_, MessageText::FIELD) => ErrorKind::InvalidMessageType,
            _ => ErrorKind::InvalidCredentials,
        }
    }
}
