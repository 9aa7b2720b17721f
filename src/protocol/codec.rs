//! Signaling wire codec
//!
//! Messages travel as single JSON objects:
//! ```text
//! {"type":"start","answer":"acknowledge","technology":"VNC","isMobile":false}
//! ```
//! Optional `start` fields are left out entirely when unset, never sent as
//! `null`.

use serde_json::Value;

use crate::common::Result;

use super::types::Message;

/// Encode a message as wire text
pub fn encode(message: &Message) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Decode wire text into a typed message
pub fn decode(text: &str) -> Result<Message> {
    Ok(serde_json::from_str(text)?)
}

/// Decode a reply from the system under test
///
/// Replies are kept as untyped JSON: the driver only needs to know that a
/// reply arrived, not what it says. Text that is not JSON is still an error.
pub fn decode_reply(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// The `type` tag of a decoded reply, if it has one
pub fn reply_type(reply: &Value) -> Option<&str> {
    reply.get("type").and_then(|v| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Error;
    use crate::protocol::{Entity, EntityKind, Role, Technology};

    #[test]
    fn test_encode_role() {
        let text = encode(&Message::role(Role::Presenter)).unwrap();
        assert_eq!(text, r#"{"type":"role","role":"presenter"}"#);
    }

    #[test]
    fn test_encode_preferences_keeps_order() {
        let text = encode(&Message::preferences(vec![
            Technology::Vnc,
            Technology::WebRtc,
        ]))
        .unwrap();
        assert_eq!(
            text,
            r#"{"type":"preferences","technologies":["VNC","WebRTC"]}"#
        );
    }

    #[test]
    fn test_encode_start_omits_unset_fields() {
        let text = encode(&Message::start_error(Technology::WebRtc)).unwrap();
        assert_eq!(
            text,
            r#"{"type":"start","answer":"error","technology":"WebRTC"}"#
        );

        let text = encode(&Message::start_acknowledge(Technology::Vnc, Some(true))).unwrap();
        assert_eq!(
            text,
            r#"{"type":"start","answer":"acknowledge","technology":"VNC","isMobile":true}"#
        );
    }

    #[test]
    fn test_encode_config_entity() {
        let text = encode(&Message::config(vec![Entity {
            id: "screen1".to_string(),
            title: "Screen 1".to_string(),
            kind: EntityKind::Screen,
        }]))
        .unwrap();
        assert_eq!(
            text,
            r#"{"type":"config","entities":[{"id":"screen1","title":"Screen 1","type":"screen"}]}"#
        );
    }

    #[test]
    fn test_decode_start_without_optional_fields() {
        let msg = decode(r#"{"type":"start","answer":"acknowledge"}"#).unwrap();
        assert_eq!(
            msg,
            Message::Start {
                answer: crate::protocol::Answer::Acknowledge,
                technology: None,
                is_mobile: None,
            }
        );
    }

    #[test]
    fn test_decode_unknown_type_fails() {
        let err = decode(r#"{"type":"hello"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_decode_reply() {
        let reply = decode_reply(r#"{"type":"start","technology":"WebRTC"}"#).unwrap();
        assert_eq!(reply_type(&reply), Some("start"));

        let reply = decode_reply("[1, 2]").unwrap();
        assert_eq!(reply_type(&reply), None);

        assert!(matches!(decode_reply("not json"), Err(Error::Json(_))));
    }
}
