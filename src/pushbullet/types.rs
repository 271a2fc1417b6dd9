// Serde types for the Pushbullet wire protocol.

use serde::{Deserialize, Serialize};

/// The Pushbullet address a note must be sent to in order to be relayed.
pub const RELAY_ADDRESS: &str = "base64tweet@azyobuzi.net";

/// A frame from the websocket event stream.
///
/// Pushbullet sends `{"type":"nop"}` keepalives and `{"type":"tickle",
/// "subtype":"push"}` change notifications. Anything else is ignored, so
/// both fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamFrame {
    #[serde(rename = "type")]
    pub frame_type: Option<String>,
    pub subtype: Option<String>,
}

impl StreamFrame {
    /// A tickle with subtype `push` means "a push changed, go fetch".
    pub fn is_push_tickle(&self) -> bool {
        self.frame_type.as_deref() == Some("tickle") && self.subtype.as_deref() == Some("push")
    }
}

/// Response from `GET /v2/pushes`.
#[derive(Debug, Deserialize)]
pub struct PushList {
    pub pushes: Vec<Push>,
}

/// A single push item. Only the fields the relay inspects are kept;
/// pushes of other kinds simply deserialize with these as `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct Push {
    pub receiver_email: Option<String>,
    #[serde(rename = "type")]
    pub push_type: Option<String>,
    pub body: Option<String>,
}

impl Push {
    /// Relay criteria: a note addressed to the relay's own address.
    pub fn is_relay_note(&self) -> bool {
        self.receiver_email.as_deref() == Some(RELAY_ADDRESS)
            && self.push_type.as_deref() == Some("note")
    }
}

/// Body for `POST /v2/pushes` — always a link push pointing back at the
/// originating status.
#[derive(Debug, Serialize)]
pub struct LinkPush<'a> {
    #[serde(rename = "type")]
    pub push_type: &'static str,
    pub title: &'a str,
    pub body: &'a str,
    pub url: &'a str,
}

impl<'a> LinkPush<'a> {
    pub fn new(title: &'a str, body: &'a str, url: &'a str) -> Self {
        Self {
            push_type: "link",
            title,
            body,
            url,
        }
    }
}
