use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label reserved for client-framework control messages on the shared data channel.
pub const MESSAGE_LABEL: &str = "rtvi-ai";

pub const CLIENT_READY: &str = "client-ready";

/// A control message exchanged with the bot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
}

impl TransportMessage {
    /// Build a message with a fresh random id.
    #[must_use]
    pub fn new(message_type: impl Into<String>, data: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: message_type.into(),
            data,
        }
    }

    #[must_use]
    pub fn client_ready() -> Self {
        Self::new(CLIENT_READY, Value::Object(serde_json::Map::new()))
    }
}

/// Wire form of a [`TransportMessage`]: the message fields plus the label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageEnvelope {
    pub label: String,
    #[serde(flatten)]
    pub message: TransportMessage,
}

impl MessageEnvelope {
    #[must_use]
    pub fn wrap(message: TransportMessage) -> Self {
        Self {
            label: MESSAGE_LABEL.to_string(),
            message,
        }
    }

    /// Extract a control message from an app-message payload.
    ///
    /// Returns `None` for payloads without the reserved label, so traffic from
    /// other applications sharing the channel is dropped.
    #[must_use]
    pub fn unwrap_app_message(payload: &Value) -> Option<TransportMessage> {
        if payload.get("label").and_then(Value::as_str) != Some(MESSAGE_LABEL) {
            return None;
        }
        match serde_json::from_value::<Self>(payload.clone()) {
            Ok(envelope) => Some(envelope.message),
            Err(err) => {
                tracing::debug!("Dropping malformed control message: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_flattens_message_fields() {
        let message = TransportMessage {
            id: "m1".to_string(),
            message_type: "action".to_string(),
            data: json!({"service": "tts"}),
        };
        let wire = serde_json::to_value(MessageEnvelope::wrap(message)).unwrap();
        assert_eq!(
            wire,
            json!({"label": "rtvi-ai", "id": "m1", "type": "action", "data": {"service": "tts"}})
        );
    }

    #[test]
    fn unwrap_requires_reserved_label() {
        let foreign = json!({"label": "chat", "id": "m1", "type": "text", "data": "hi"});
        assert!(MessageEnvelope::unwrap_app_message(&foreign).is_none());

        let unlabeled = json!({"id": "m1", "type": "text", "data": "hi"});
        assert!(MessageEnvelope::unwrap_app_message(&unlabeled).is_none());

        let ours = json!({"label": "rtvi-ai", "id": "m2", "type": "bot-ready", "data": {}});
        let message = MessageEnvelope::unwrap_app_message(&ours).expect("control message");
        assert_eq!(message.id, "m2");
        assert_eq!(message.message_type, "bot-ready");
    }

    #[test]
    fn unwrap_drops_malformed_payload() {
        let missing_type = json!({"label": "rtvi-ai", "id": "m3"});
        assert!(MessageEnvelope::unwrap_app_message(&missing_type).is_none());
    }

    #[test]
    fn client_ready_has_fresh_id() {
        let a = TransportMessage::client_ready();
        let b = TransportMessage::client_ready();
        assert_eq!(a.message_type, CLIENT_READY);
        assert_ne!(a.id, b.id);
        assert_eq!(a.data, json!({}));
    }
}
