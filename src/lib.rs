//! Typed Rust client for the Free Mobile SMS notification gateway.
//!
//! The gateway delivers text messages to the account owner's own phone. It accepts
//! plain text of at most 999 characters per call, so the client masks symbols the
//! gateway cannot carry, splits longer messages into chunks, and posts the chunks
//! strictly one after another. The crate is split into a domain layer of strong
//! types (no I/O), a transport layer for the wire format, and a small client layer
//! orchestrating calls.
//!
//! ```rust,no_run
//! use freemobile::{Credentials, FreeMobileClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), freemobile::FreeMobileError> {
//!     let client = FreeMobileClient::new(Credentials::new("12345678", "...")?);
//!     let response = client.send("Backup finished \u{2714}").await?;
//!     println!("delivered in {} chunk(s)", response.len());
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxError, BoxFuture, FreeMobileClient, FreeMobileClientBuilder, FreeMobileError,
    HttpResponse, HttpTransport, ReqwestTransport,
};
pub use domain::{
    AllowList, ChunkResponse, Credentials, ErrorKind, MAX_CHUNK_LENGTH, MessageText, Pass,
    Sanitized, Sanitizer, SendResponse, User, ValidationError,
};
