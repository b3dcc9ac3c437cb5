use serde::{Deserialize, Serialize};

/// Liveness frame sent over the WebSocket transport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimestampMessage {
    pub timestamp: i64,
}

impl TimestampMessage {
    pub fn new(timestamp: i64) -> Self {
        Self { timestamp }
    }
}

/// JSON body answered on the keep-alive route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeepAliveReply {
    pub status: String,
}

impl Default for KeepAliveReply {
    fn default() -> Self {
        Self {
            status: super::constants::OK_BODY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_message_wire_shape() {
        let json = serde_json::to_string(&TimestampMessage::new(1_700_000_000)).unwrap();
        assert_eq!(json, r#"{"timestamp":1700000000}"#);
    }

    #[test]
    fn test_timestamp_message_rejects_missing_field() {
        let parsed = serde_json::from_str::<TimestampMessage>(r#"{"time":1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_keep_alive_reply_default() {
        let value = serde_json::to_value(KeepAliveReply::default()).unwrap();
        assert_eq!(value, serde_json::json!({ "status": "Ok" }));
    }
}
