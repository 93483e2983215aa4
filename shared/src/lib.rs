use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

pub mod envelope;

/// The kind of content being analyzed. Picks the endpoint, the fallback
/// error message and the shape of [`AnalysisStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
}

impl Modality {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Modality::Text => "detect-text",
            Modality::Image => "detect-image",
        }
    }

    /// Message shown when a request fails without a usable server message.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Modality::Text => "Failed to analyze text",
            Modality::Image => "Failed to analyze image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
pub enum DetectionMethod {
    #[serde(rename = "pattern")]
    #[strum(serialize = "pattern")]
    Pattern,
    #[serde(rename = "hybrid")]
    #[strum(serialize = "hybrid")]
    Hybrid,
    #[serde(rename = "ai-hybrid")]
    #[strum(serialize = "ai-hybrid")]
    AiHybrid,
    #[serde(rename = "unknown", other)]
    #[strum(serialize = "unknown")]
    Unknown,
}

/// Image detectors report either how many methods ran or their names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectionMethods {
    Count(u64),
    Names(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStats {
    pub word_count: Option<u64>,
    pub sentence_count: Option<u64>,
    pub avg_sentence_length: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageStats {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<String>,
    pub detection_methods: Option<DetectionMethods>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStats {
    Text(TextStats),
    Image(ImageStats),
}

impl AnalysisStats {
    pub fn modality(&self) -> Modality {
        match self {
            AnalysisStats::Text(_) => Modality::Text,
            AnalysisStats::Image(_) => Modality::Image,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub method: Option<DetectionMethod>,
    pub stats: AnalysisStats,
}

/// Outcome of one successful detection exchange.
///
/// Serializes to the same camelCase document the detection service sends.
/// Decoding goes through [`RawAnalysisResult::resolve`] because the wire
/// format does not say which modality the statistics belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "RawAnalysisResult")]
pub struct AnalysisResult {
    pub is_ai: bool,
    pub confidence: f64,
    pub analysis: Analysis,
    pub reasons: Vec<String>,
}

impl AnalysisResult {
    pub fn modality(&self) -> Modality {
        self.analysis.stats.modality()
    }
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Confidence out of range: {0}")]
    ConfidenceOutOfRange(f64),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<DetectionMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_sentence_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_methods: Option<DetectionMethods>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisResult {
    #[serde(rename = "isAI")]
    pub is_ai: bool,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<RawAnalysis>,
    #[serde(default)]
    pub reasons: Option<Vec<String>>,
}

impl RawAnalysisResult {
    pub fn resolve(self, modality: Modality) -> Result<AnalysisResult, ModelError> {
        if !self.confidence.is_finite() || !(0.0..=100.0).contains(&self.confidence) {
            return Err(ModelError::ConfidenceOutOfRange(self.confidence));
        }

        let raw = self.analysis.unwrap_or_default();
        let stats = match modality {
            Modality::Text => AnalysisStats::Text(TextStats {
                word_count: raw.word_count,
                sentence_count: raw.sentence_count,
                avg_sentence_length: raw.avg_sentence_length,
            }),
            Modality::Image => AnalysisStats::Image(ImageStats {
                width: raw.width,
                height: raw.height,
                format: raw.format,
                detection_methods: raw.detection_methods,
            }),
        };

        Ok(AnalysisResult {
            is_ai: self.is_ai,
            confidence: self.confidence,
            analysis: Analysis {
                method: raw.method,
                stats,
            },
            reasons: self.reasons.unwrap_or_default(),
        })
    }
}

impl From<AnalysisResult> for RawAnalysisResult {
    fn from(result: AnalysisResult) -> Self {
        let mut raw = RawAnalysis {
            method: result.analysis.method,
            ..RawAnalysis::default()
        };
        match result.analysis.stats {
            AnalysisStats::Text(stats) => {
                raw.word_count = stats.word_count;
                raw.sentence_count = stats.sentence_count;
                raw.avg_sentence_length = stats.avg_sentence_length;
            }
            AnalysisStats::Image(stats) => {
                raw.width = stats.width;
                raw.height = stats.height;
                raw.format = stats.format;
                raw.detection_methods = stats.detection_methods;
            }
        }

        Self {
            is_ai: result.is_ai,
            confidence: result.confidence,
            analysis: Some(raw),
            reasons: Some(result.reasons),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DetectTextRequest {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn raw(value: serde_json::Value) -> RawAnalysisResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn text_stats_keep_absent_fields_absent() {
        let result = raw(json!({
            "isAI": false,
            "confidence": 12,
            "analysis": { "method": "pattern", "wordCount": 40 },
            "reasons": ["Varied sentence length"]
        }))
        .resolve(Modality::Text)
        .unwrap();

        assert_eq!(result.analysis.method, Some(DetectionMethod::Pattern));
        assert_eq!(
            result.analysis.stats,
            AnalysisStats::Text(TextStats {
                word_count: Some(40),
                sentence_count: None,
                avg_sentence_length: None,
            })
        );
    }

    #[test]
    fn image_stats_are_picked_by_modality() {
        let result = raw(json!({
            "isAI": true,
            "confidence": 91.5,
            "analysis": {
                "method": "hybrid",
                "width": 1024,
                "height": 768,
                "format": "png",
                "detectionMethods": ["metadata", "frequency"]
            }
        }))
        .resolve(Modality::Image)
        .unwrap();

        assert_eq!(result.modality(), Modality::Image);
        match result.analysis.stats {
            AnalysisStats::Image(stats) => {
                assert_eq!(stats.width, Some(1024));
                assert_eq!(stats.height, Some(768));
                assert_eq!(stats.format.as_deref(), Some("png"));
                assert_eq!(
                    stats.detection_methods,
                    Some(DetectionMethods::Names(vec!["metadata".into(), "frequency".into()]))
                );
            }
            other => panic!("expected image stats, got {:?}", other),
        }
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn missing_analysis_and_null_reasons() {
        let result = raw(json!({ "isAI": true, "confidence": 50, "reasons": null }))
            .resolve(Modality::Text)
            .unwrap();

        assert_eq!(result.analysis.method, None);
        assert_eq!(result.analysis.stats, AnalysisStats::Text(TextStats::default()));
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn unknown_method_does_not_fail_decoding() {
        let result = raw(json!({
            "isAI": false,
            "confidence": 3,
            "analysis": { "method": "ensemble", "detectionMethods": 4 }
        }))
        .resolve(Modality::Image)
        .unwrap();

        assert_eq!(result.analysis.method, Some(DetectionMethod::Unknown));
        match result.analysis.stats {
            AnalysisStats::Image(stats) => {
                assert_eq!(stats.detection_methods, Some(DetectionMethods::Count(4)))
            }
            other => panic!("expected image stats, got {:?}", other),
        }
    }

    #[test]
    fn confidence_must_be_a_percentage() {
        for confidence in [-1.0, 100.5] {
            let err = RawAnalysisResult {
                is_ai: true,
                confidence,
                analysis: None,
                reasons: None,
            }
            .resolve(Modality::Text)
            .unwrap_err();
            assert!(matches!(err, ModelError::ConfidenceOutOfRange(c) if c == confidence));
        }
    }

    #[test]
    fn serializes_in_wire_shape() {
        let result = AnalysisResult {
            is_ai: true,
            confidence: 87.0,
            analysis: Analysis {
                method: Some(DetectionMethod::AiHybrid),
                stats: AnalysisStats::Text(TextStats {
                    word_count: Some(120),
                    sentence_count: Some(6),
                    avg_sentence_length: Some(20.0),
                }),
            },
            reasons: vec!["r1".into(), "r2".into()],
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "isAI": true,
                "confidence": 87.0,
                "analysis": {
                    "method": "ai-hybrid",
                    "wordCount": 120,
                    "sentenceCount": 6,
                    "avgSentenceLength": 20.0
                },
                "reasons": ["r1", "r2"]
            })
        );
    }

    #[test]
    fn modality_endpoints_and_names() {
        assert_eq!(Modality::Text.endpoint(), "detect-text");
        assert_eq!(Modality::Image.endpoint(), "detect-image");
        assert_eq!(Modality::Image.to_string(), "image");
        assert_eq!(Modality::from_str("text").unwrap(), Modality::Text);
        assert_eq!(DetectionMethod::AiHybrid.as_ref(), "ai-hybrid");
    }
}
