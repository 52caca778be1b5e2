//! Domain layer: strong types, sanitization, and chunking (no I/O).

mod chunk;
mod kind;
mod response;
mod sanitize;
mod validation;
mod value;

pub use chunk::{MAX_CHUNK_LENGTH, chunk};
pub use kind::ErrorKind;
pub use response::{ChunkResponse, SendResponse};
pub use sanitize::{
    AllowList, DEFAULT_PLACEHOLDER, DEFAULT_UNSUPPORTED_NOTE, Sanitized, Sanitizer,
};
pub use validation::ValidationError;
pub use value::{Credentials, MessageText, Pass, User};
