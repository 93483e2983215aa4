//! Wire envelopes wrapped around detection payloads.
//!
//! A successful response body is `{ "data": <result> }`, a failed one carries
//! at least `{ "error": "<message>" }`.

use serde::{Deserialize, Serialize};

use crate::{AnalysisResult, Modality, ModelError, RawAnalysisResult};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuccessEnvelope<T> {
    pub data: T,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
}

pub fn decode_result(modality: Modality, body: &[u8]) -> Result<AnalysisResult, ModelError> {
    let envelope: SuccessEnvelope<RawAnalysisResult> = serde_json::from_slice(body)?;
    envelope.data.resolve(modality)
}

pub fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_success_envelope() {
        let body = br#"{"data":{"isAI":true,"confidence":87,"reasons":["r1","r2"]}}"#;
        let result = decode_result(Modality::Text, body).unwrap();

        assert!(result.is_ai);
        assert_eq!(result.confidence, 87.0);
        assert_eq!(result.reasons, vec!["r1".to_string(), "r2".to_string()]);
    }

    #[test]
    fn rejects_body_without_data() {
        let err = decode_result(Modality::Image, br#"{"isAI":true,"confidence":87}"#).unwrap_err();
        assert!(matches!(err, ModelError::JsonError(_)));
    }

    #[test]
    fn server_message_variants() {
        assert_eq!(server_message(br#"{"error":"bad input"}"#).as_deref(), Some("bad input"));
        assert_eq!(server_message(br#"{"error":""}"#), None);
        assert_eq!(server_message(br#"{"error":{"code":3}}"#), None);
        assert_eq!(server_message(br#"{"message":"nope"}"#), None);
        assert_eq!(server_message(b"<html>502 Bad Gateway</html>"), None);
        assert_eq!(server_message(b""), None);
    }
}
