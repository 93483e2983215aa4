use client::SessionState;
use shared::{
    AnalysisResult, AnalysisStats, DetectionMethod, DetectionMethods, ImageStats, Modality,
    TextStats,
};
use std::fmt::{Display, Write};

const BAR_WIDTH: usize = 20;

pub fn render_state(state: &SessionState, modality: Modality) -> String {
    match state {
        SessionState::Idle => "No analysis yet.".to_string(),
        SessionState::Submitting => format!("Analyzing {}...", modality),
        SessionState::Succeeded(result) => render_result(result),
        SessionState::Failed(message) => format!("⚠️  {}", message),
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let modality = result.modality();
    let mut out = String::new();

    let _ = writeln!(out, "{}", verdict(result.is_ai, modality));
    let _ = write!(out, "Confidence: {}%", result.confidence);
    if let Some(label) = result
        .analysis
        .method
        .and_then(|method| method_label(method, modality))
    {
        let _ = write!(out, "  [{}]", label);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {}",
        confidence_bar(result.confidence),
        confidence_level(result.confidence)
    );

    match &result.analysis.stats {
        AnalysisStats::Text(stats) => {
            let _ = writeln!(out, "{}", text_stats_line(stats));
        }
        AnalysisStats::Image(stats) => {
            let _ = writeln!(out, "{}", image_stats_line(stats));
        }
    }

    if !result.reasons.is_empty() {
        match modality {
            Modality::Text => {
                let _ = writeln!(out, "Detection Analysis:");
                for (index, reason) in result.reasons.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", index + 1, reason);
                }
            }
            Modality::Image => {
                let _ = writeln!(out, "Detection Reasons:");
                for reason in &result.reasons {
                    let _ = writeln!(out, "  • {}", reason);
                }
            }
        }
    }

    out.trim_end().to_string()
}

fn verdict(is_ai: bool, modality: Modality) -> &'static str {
    match (is_ai, modality) {
        (true, _) => "🤖 AI Generated",
        (false, Modality::Text) => "👤 Human Written",
        (false, Modality::Image) => "📸 Real Image",
    }
}

fn method_label(method: DetectionMethod, modality: Modality) -> Option<&'static str> {
    match (modality, method) {
        (_, DetectionMethod::Unknown) => None,
        (Modality::Text, DetectionMethod::AiHybrid) => Some("AI Model"),
        (_, DetectionMethod::Hybrid) => Some("AI+Pattern"),
        (Modality::Text, DetectionMethod::Pattern) => Some("Pattern Analysis"),
        (Modality::Image, _) => Some("Pattern"),
    }
}

fn confidence_level(confidence: f64) -> &'static str {
    if confidence > 70.0 {
        "(high)"
    } else if confidence > 40.0 {
        "(medium)"
    } else {
        "(low)"
    }
}

fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn text_stats_line(stats: &TextStats) -> String {
    format!(
        "Words: {} | Sentences: {} | Avg Length: {}",
        or_na(stats.word_count),
        or_na(stats.sentence_count),
        or_na(stats.avg_sentence_length)
    )
}

fn image_stats_line(stats: &ImageStats) -> String {
    let methods = stats.detection_methods.as_ref().map(|methods| match methods {
        DetectionMethods::Count(count) => count.to_string(),
        DetectionMethods::Names(names) => names.join(", "),
    });

    format!(
        "Width: {} | Height: {} | Format: {} | Methods: {}",
        or_na(stats.width.map(|w| format!("{}px", w))),
        or_na(stats.height.map(|h| format!("{}px", h))),
        or_na(stats.format.as_ref().map(|f| f.to_uppercase())),
        or_na(methods)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Analysis;

    fn text_result(stats: TextStats, method: Option<DetectionMethod>) -> AnalysisResult {
        AnalysisResult {
            is_ai: true,
            confidence: 87.0,
            analysis: Analysis {
                method,
                stats: AnalysisStats::Text(stats),
            },
            reasons: vec!["r1".into(), "r2".into()],
        }
    }

    #[test]
    fn absent_text_stats_render_as_not_applicable() {
        let rendered = render_result(&text_result(
            TextStats {
                word_count: Some(0),
                sentence_count: None,
                avg_sentence_length: Some(12.5),
            },
            Some(DetectionMethod::AiHybrid),
        ));

        assert!(rendered.starts_with("🤖 AI Generated\nConfidence: 87%  [AI Model]"));
        assert!(rendered.contains("Words: 0 | Sentences: N/A | Avg Length: 12.5"));
        assert!(rendered.ends_with("Detection Analysis:\n  1. r1\n  2. r2"));
    }

    #[test]
    fn image_result_lines() {
        let result = AnalysisResult {
            is_ai: false,
            confidence: 64.5,
            analysis: Analysis {
                method: Some(DetectionMethod::Pattern),
                stats: AnalysisStats::Image(ImageStats {
                    width: Some(800),
                    height: None,
                    format: Some("jpeg".into()),
                    detection_methods: Some(DetectionMethods::Names(vec![
                        "metadata".into(),
                        "frequency".into(),
                    ])),
                }),
            },
            reasons: vec!["No camera EXIF".into()],
        };

        let rendered = render_result(&result);
        assert!(rendered.starts_with("📸 Real Image\nConfidence: 64.5%  [Pattern]"));
        assert!(rendered.contains("(medium)"));
        assert!(rendered.contains(
            "Width: 800px | Height: N/A | Format: JPEG | Methods: metadata, frequency"
        ));
        assert!(rendered.ends_with("Detection Reasons:\n  • No camera EXIF"));
    }

    #[test]
    fn method_labels_per_modality() {
        assert_eq!(method_label(DetectionMethod::AiHybrid, Modality::Text), Some("AI Model"));
        assert_eq!(method_label(DetectionMethod::Hybrid, Modality::Text), Some("AI+Pattern"));
        assert_eq!(
            method_label(DetectionMethod::Pattern, Modality::Text),
            Some("Pattern Analysis")
        );
        assert_eq!(method_label(DetectionMethod::Hybrid, Modality::Image), Some("AI+Pattern"));
        assert_eq!(method_label(DetectionMethod::AiHybrid, Modality::Image), Some("Pattern"));
        assert_eq!(method_label(DetectionMethod::Unknown, Modality::Text), None);
    }

    #[test]
    fn no_reasons_no_heading() {
        let mut result = text_result(TextStats::default(), None);
        result.reasons.clear();
        let rendered = render_result(&result);

        assert!(!rendered.contains("Detection Analysis"));
        assert!(rendered.contains("Confidence: 87%\n"));
    }

    #[test]
    fn confidence_bar_bounds() {
        assert_eq!(confidence_bar(0.0), format!("[{}]", "-".repeat(BAR_WIDTH)));
        assert_eq!(confidence_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(confidence_bar(50.0), "[##########----------]");
        assert_eq!(confidence_level(70.0), "(medium)");
        assert_eq!(confidence_level(40.0), "(low)");
    }

    #[test]
    fn renders_each_state() {
        assert_eq!(render_state(&SessionState::Idle, Modality::Text), "No analysis yet.");
        assert_eq!(
            render_state(&SessionState::Submitting, Modality::Image),
            "Analyzing image..."
        );
        assert_eq!(
            render_state(&SessionState::Failed("bad input".into()), Modality::Text),
            "⚠️  bad input"
        );
    }
}
