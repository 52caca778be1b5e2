//! Transport layer: wire-format details of the gateway call.

mod send_message;

pub use send_message::encode_send_message_body;
