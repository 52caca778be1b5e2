use serde_json::{Map, Value};

use crate::domain::{Credentials, MessageText, Pass, User};

/// JSON body for one `sendmsg` call carrying a single chunk.
pub fn encode_send_message_body(credentials: &Credentials, chunk: &str) -> Value {
    let mut body = Map::new();
    body.insert(
        User::FIELD.to_owned(),
        Value::String(credentials.user().as_str().to_owned()),
    );
    body.insert(
        Pass::FIELD.to_owned(),
        Value::String(credentials.pass().as_str().to_owned()),
    );
    body.insert(MessageText::FIELD.to_owned(), Value::String(chunk.to_owned()));
    Value::Object(body)
}
