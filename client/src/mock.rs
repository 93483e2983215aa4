use async_trait::async_trait;
use shared::{Analysis, AnalysisResult, AnalysisStats, DetectionMethod, TextStats};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::capture::{AnalysisInput, ImageFile};
use crate::detection::DetectionClient;
use crate::error::AnalysisError;

pub(crate) fn sample_result() -> AnalysisResult {
    AnalysisResult {
        is_ai: true,
        confidence: 87.0,
        analysis: Analysis {
            method: Some(DetectionMethod::Hybrid),
            stats: AnalysisStats::Text(TextStats::default()),
        },
        reasons: vec!["r1".into(), "r2".into()],
    }
}

/// Records every call and replays queued outcomes. With a gate, each call
/// stays in flight until the gate is notified.
#[derive(Default)]
pub(crate) struct MockDetectionClient {
    outcomes: Mutex<VecDeque<Result<AnalysisResult, AnalysisError>>>,
    calls: Mutex<Vec<AnalysisInput>>,
    gate: Option<Arc<Notify>>,
}

impl MockDetectionClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub(crate) fn respond_with(self, outcome: Result<AnalysisResult, AnalysisError>) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub(crate) fn calls(&self) -> Vec<AnalysisInput> {
        self.calls.lock().unwrap().clone()
    }

    async fn call(&self, input: AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        let modality = input.modality();
        self.calls.lock().unwrap().push(input);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or(Err(AnalysisError::Rejected {
            modality,
            status: 500,
        }))
    }
}

#[async_trait]
impl DetectionClient for MockDetectionClient {
    async fn analyze_text(&self, content: &str) -> Result<AnalysisResult, AnalysisError> {
        self.call(AnalysisInput::text(content)).await
    }

    async fn analyze_image(&self, file: &ImageFile) -> Result<AnalysisResult, AnalysisError> {
        self.call(AnalysisInput::image(file.clone())).await
    }
}
