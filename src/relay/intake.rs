//! Request intake
//!
//! Turns an inbound body into a validated [`InboundMessage`]. Both modes
//! trim the text and reject it when nothing is left.

use crate::error::{AppError, AppResult};
use serde_json::Value;

/// Name of the field carrying the message in structured bodies
pub const MESSAGE_FIELD: &str = "message";

/// Validated user message, non-empty after trimming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    text: String,
}

impl InboundMessage {
    /// Trim `raw` and reject it if empty
    pub fn new(raw: &str) -> AppResult<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(AppError::InvalidRequest(
                "message cannot be empty or contain only whitespace".to_string(),
            ));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    /// Structured mode: read the `message` field of a JSON object body
    ///
    /// A body that is not JSON, not an object, or whose `message` is absent,
    /// null, or not a string is treated as a missing message.
    pub fn from_json_body(body: &[u8]) -> AppResult<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            AppError::InvalidRequest(format!("body is not valid JSON: {}", e))
        })?;

        let message = value
            .get(MESSAGE_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::InvalidRequest(format!("'{}' must be a string", MESSAGE_FIELD))
            })?;

        Self::new(message)
    }

    /// Plain-text mode: the whole body is the message
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn from_raw_body(body: &[u8]) -> AppResult<Self> {
        Self::new(&String::from_utf8_lossy(body))
    }

    /// The trimmed message text
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_json_body_extracts_and_trims_message() {
        let msg = InboundMessage::from_json_body(br#"{"message": "  hello  "}"#).unwrap();
        assert_eq!(msg.text(), "hello");
    }

    #[test]
    fn test_json_body_ignores_extra_fields() {
        let msg =
            InboundMessage::from_json_body(br#"{"message": "hi", "user": "bob", "n": 3}"#)
                .unwrap();
        assert_eq!(msg.text(), "hi");
    }

    #[test]
    fn test_json_body_rejections() {
        let bodies: [&[u8]; 9] = [
            b"",
            b"not json",
            br#"{}"#,
            br#"{"message": null}"#,
            br#"{"message": ""}"#,
            br#"{"message": " \n\t "}"#,
            br#"{"message": 42}"#,
            br#"["message"]"#,
            br#""message""#,
        ];
        for body in bodies {
            let err = InboundMessage::from_json_body(body)
                .expect_err(&format!("{:?} should be rejected", String::from_utf8_lossy(body)));
            assert!(err.is_client_error());
            assert_eq!(err.code(), "message_missing");
        }
    }

    #[test]
    fn test_raw_body_trims() {
        let msg = InboundMessage::from_raw_body(b"\n  what time is it?\r\n").unwrap();
        assert_eq!(msg.text(), "what time is it?");
    }

    #[test]
    fn test_raw_body_whitespace_only_rejected() {
        let err = InboundMessage::from_raw_body(b"   ").unwrap_err();
        assert_eq!(err.plain_text(), "message missing");
    }

    #[test]
    fn test_raw_body_lossy_utf8() {
        let msg = InboundMessage::from_raw_body(&[b'h', b'i', 0xFF]).unwrap();
        assert!(msg.text().starts_with("hi"));
    }

    proptest! {
        #[test]
        fn prop_whitespace_only_is_always_rejected(ws in "[ \t\r\n]{0,32}") {
            prop_assert!(InboundMessage::from_raw_body(ws.as_bytes()).is_err());
            let body = serde_json::json!({ "message": ws }).to_string();
            prop_assert!(InboundMessage::from_json_body(body.as_bytes()).is_err());
        }

        #[test]
        fn prop_accepted_text_equals_trimmed_input(text in "\\PC{0,64}") {
            match InboundMessage::new(&text) {
                Ok(msg) => {
                    prop_assert_eq!(msg.text(), text.trim());
                    prop_assert!(!msg.text().is_empty());
                }
                Err(_) => prop_assert!(text.trim().is_empty()),
            }
        }

        #[test]
        fn prop_both_modes_agree(text in "\\PC{0,64}") {
            let raw = InboundMessage::from_raw_body(text.as_bytes()).ok();
            let body = serde_json::json!({ "message": text }).to_string();
            let structured = InboundMessage::from_json_body(body.as_bytes()).ok();
            prop_assert_eq!(raw, structured);
        }
    }
}
