//! Events emitted by the live subscription

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// Namespace connection acknowledged by the server
    Connected,
    Disconnected,
    /// A named socket.io event and its first argument
    Message { event: String, payload: Value },
    Error(String),
}

impl LiveEvent {
    /// Payload of a message with the given event name
    pub fn payload_for(&self, name: &str) -> Option<&Value> {
        match self {
            LiveEvent::Message { event, payload } if event == name => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_for() {
        let event = LiveEvent::Message {
            event: "statusUpdated".to_string(),
            payload: json!({"id": "66f0c1", "status": "RESOLVED"}),
        };
        assert_eq!(event.payload_for("statusUpdated").unwrap()["status"], "RESOLVED");
        assert!(event.payload_for("feedbackCreated").is_none());
        assert!(LiveEvent::Connected.payload_for("statusUpdated").is_none());
    }
}
