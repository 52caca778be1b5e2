use std::env::VarError;
use std::fmt;

use serde_json::Value;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Free Mobile account identifier (`user`).
///
/// Invariant: non-empty. The value is an opaque login and is kept exactly as given.
pub struct User(String);

impl User {
    /// Body field name used by the gateway (`user`).
    pub const FIELD: &'static str = "user";

    /// Create a validated [`User`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the account identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Free Mobile API key (`pass`).
///
/// Invariant: non-empty. `Debug` output never contains the secret.
pub struct Pass(String);

impl Pass {
    /// Body field name used by the gateway (`pass`).
    pub const FIELD: &'static str = "pass";

    /// Create a validated [`Pass`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pass(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Account identity sent with every gateway call.
pub struct Credentials {
    user: User,
    pass: Pass,
}

impl Credentials {
    /// Name used when the credentials value as a whole is rejected.
    pub const FIELD: &'static str = "credentials";

    /// Environment variable read by [`Credentials::from_env`] for the user.
    pub const USER_ENV: &'static str = "FREEMOBILE_USER";
    /// Environment variable read by [`Credentials::from_env`] for the pass.
    pub const PASS_ENV: &'static str = "FREEMOBILE_PASS";

    /// Validate both parts. `user` is checked first.
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            user: User::new(user)?,
            pass: Pass::new(pass)?,
        })
    }

    /// Validate an untyped value such as a parsed JSON config entry.
    ///
    /// - anything other than an object (including `null`) is rejected as a whole,
    /// - `user` and `pass` must be present, strings, and non-empty.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError::NotAnObject { field: Self::FIELD });
        };
        let user = User::new(string_field(object, User::FIELD)?)?;
        let pass = Pass::new(string_field(object, Pass::FIELD)?)?;
        Ok(Self { user, pass })
    }

    /// Read credentials from `FREEMOBILE_USER` and `FREEMOBILE_PASS`.
    pub fn from_env() -> Result<Self, ValidationError> {
        let user = env_field(std::env::var(Self::USER_ENV), User::FIELD)?;
        let pass = env_field(std::env::var(Self::PASS_ENV), Pass::FIELD)?;
        Self::new(user, pass)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn pass(&self) -> &Pass {
        &self.pass
    }
}

fn env_field(
    value: Result<String, VarError>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Err(ValidationError::Missing { field }),
        Err(VarError::NotUnicode(_)) => Err(ValidationError::NotAString { field }),
    }
}

fn string_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, ValidationError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(ValidationError::Missing { field }),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(ValidationError::NotAString { field }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sanitized message text (`msg`) ready to be chunked.
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Body field name used by the gateway (`msg`).
    pub const FIELD: &'static str = "msg";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Extract raw message input from an untyped value; only strings are accepted.
    pub fn input_from_value(value: &Value) -> Result<&str, ValidationError> {
        value
            .as_str()
            .ok_or(ValidationError::NotAString { field: Self::FIELD })
    }

    /// Borrow the message text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append `note` after a blank line.
    pub(crate) fn with_note(self, note: &str) -> Self {
        Self(format!("{}\n\n{note}", self.0))
    }
}
