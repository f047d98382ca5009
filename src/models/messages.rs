use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope shared by every frame a client sends.
#[derive(Deserialize, Debug)]
struct Envelope {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Payload of an inbound `update`. Missing fields default: text to "" and author to null.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct UpdateRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: Value,
}

/// A message received from a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceivedMessage {
    Update(UpdateRequest),
    Meta(Value),
    Ping,
    /// Any kind this server does not understand, including a missing `type`.
    Unknown(String),
}

impl ReceivedMessage {
    /// Parse a text frame. Errors only when the frame is not a JSON object or
    /// an `update` payload has the wrong shape.
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        let envelope: Envelope = serde_json::from_str(frame)?;
        let kind = envelope.kind.unwrap_or_default();
        let msg = match kind.as_str() {
            "update" => {
                let update = match envelope.payload {
                    Value::Null => UpdateRequest::default(),
                    payload => serde_json::from_value(payload)?,
                };
                ReceivedMessage::Update(update)
            }
            "meta" => ReceivedMessage::Meta(envelope.payload),
            "ping" => ReceivedMessage::Ping,
            _ => ReceivedMessage::Unknown(kind),
        };
        Ok(msg)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InitMessage {
    pub text: String,
    pub last_updated: Option<String>,
    pub online: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UpdateMessage {
    pub text: String,
    pub last_updated: String,
    pub author: Value,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PresenceMessage {
    pub online: usize,
}

/// A message sent to clients. Built per event and serialized once per delivery round.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum SendMessage {
    Init(InitMessage),
    Update(UpdateMessage),
    Meta(Value),
    Presence(PresenceMessage),
    Pong,
}

impl SendMessage {
    pub fn presence(online: usize) -> Self {
        SendMessage::Presence(PresenceMessage { online })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SendMessage::Init(_) => "init",
            SendMessage::Update(_) => "update",
            SendMessage::Meta(_) => "meta",
            SendMessage::Presence(_) => "presence",
            SendMessage::Pong => "pong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_update_with_text_and_author() {
        let msg = ReceivedMessage::parse(r#"{"type":"update","payload":{"text":"hi","author":"alice"}}"#).unwrap();
        assert_eq!(
            msg,
            ReceivedMessage::Update(UpdateRequest { text: "hi".to_string(), author: json!("alice") })
        );
    }

    #[test]
    fn update_fields_default_when_absent() {
        let msg = ReceivedMessage::parse(r#"{"type":"update","payload":{}}"#).unwrap();
        assert_eq!(msg, ReceivedMessage::Update(UpdateRequest::default()));

        let msg = ReceivedMessage::parse(r#"{"type":"update"}"#).unwrap();
        assert_eq!(msg, ReceivedMessage::Update(UpdateRequest::default()));
    }

    #[test]
    fn update_keeps_structured_author() {
        let msg = ReceivedMessage::parse(r##"{"type":"update","payload":{"text":"x","author":{"name":"bob","color":"#f00"}}}"##).unwrap();
        match msg {
            ReceivedMessage::Update(update) => assert_eq!(update.author, json!({"name":"bob","color":"#f00"})),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn update_with_non_string_text_is_an_error() {
        assert!(ReceivedMessage::parse(r#"{"type":"update","payload":{"text":42}}"#).is_err());
        assert!(ReceivedMessage::parse(r#"{"type":"update","payload":"text"}"#).is_err());
    }

    #[test]
    fn meta_payload_is_kept_verbatim() {
        let msg = ReceivedMessage::parse(r#"{"type":"meta","payload":{"username":"carol","extra":[1,2]}}"#).unwrap();
        assert_eq!(msg, ReceivedMessage::Meta(json!({"username":"carol","extra":[1,2]})));
    }

    #[test]
    fn ping_ignores_payload() {
        assert_eq!(ReceivedMessage::parse(r#"{"type":"ping"}"#).unwrap(), ReceivedMessage::Ping);
        assert_eq!(ReceivedMessage::parse(r#"{"type":"ping","payload":{"t":1}}"#).unwrap(), ReceivedMessage::Ping);
    }

    #[test]
    fn unknown_and_missing_kinds_fall_back() {
        assert_eq!(
            ReceivedMessage::parse(r#"{"type":"cursor","payload":{"pos":3}}"#).unwrap(),
            ReceivedMessage::Unknown("cursor".to_string())
        );
        assert_eq!(
            ReceivedMessage::parse(r#"{"payload":{}}"#).unwrap(),
            ReceivedMessage::Unknown(String::new())
        );
    }

    #[test]
    fn non_object_frames_are_errors() {
        assert!(ReceivedMessage::parse("not json").is_err());
        assert!(ReceivedMessage::parse("[1,2,3]").is_err());
        assert!(ReceivedMessage::parse(r#"{"type":7}"#).is_err());
    }

    #[test]
    fn outbound_shapes() {
        let init = SendMessage::Init(InitMessage { text: String::new(), last_updated: None, online: 1 });
        assert_eq!(
            serde_json::to_value(&init).unwrap(),
            json!({"type":"init","payload":{"text":"","last_updated":null,"online":1}})
        );

        let update = SendMessage::Update(UpdateMessage {
            text: "hello".to_string(),
            last_updated: "2026-01-01T00:00:00.000000Z".to_string(),
            author: Value::Null,
        });
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"type":"update","payload":{"text":"hello","last_updated":"2026-01-01T00:00:00.000000Z","author":null}})
        );

        assert_eq!(
            serde_json::to_value(SendMessage::Meta(json!({"k":"v"}))).unwrap(),
            json!({"type":"meta","payload":{"k":"v"}})
        );
        assert_eq!(
            serde_json::to_value(SendMessage::presence(2)).unwrap(),
            json!({"type":"presence","payload":{"online":2}})
        );
        assert_eq!(serde_json::to_value(SendMessage::Pong).unwrap(), json!({"type":"pong"}));
    }
}
