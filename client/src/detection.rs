use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, RequestBuilder};
use shared::envelope::{decode_result, server_message};
use shared::{AnalysisResult, DetectTextRequest, Modality};

use crate::capture::{AnalysisInput, ImageFile};
use crate::config::ClientConfig;
use crate::error::{AnalysisError, ConfigError};

pub const IMAGE_FIELD: &str = "image";

/// One request/response exchange with the detection service per call.
/// Implementations never retry and report every failure as an
/// [`AnalysisError`] whose message is ready to show.
#[async_trait]
pub trait DetectionClient: Send + Sync {
    async fn analyze_text(&self, content: &str) -> Result<AnalysisResult, AnalysisError>;

    async fn analyze_image(&self, file: &ImageFile) -> Result<AnalysisResult, AnalysisError>;

    async fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult, AnalysisError> {
        match input {
            AnalysisInput::Text { content } => self.analyze_text(content).await,
            AnalysisInput::Image { file } => self.analyze_image(file).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HttpDetectionClient {
    http_client: HttpClient,
    text_url: String,
    image_url: String,
}

impl HttpDetectionClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http_client = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            text_url: config.endpoint(Modality::Text),
            image_url: config.endpoint(Modality::Image),
        })
    }

    async fn exchange(
        &self,
        modality: Modality,
        request: RequestBuilder,
    ) -> Result<AnalysisResult, AnalysisError> {
        let response = request.send().await.map_err(|e| {
            let err = AnalysisError::transport(modality, e);
            log::warn!("{} detection request failed: {:?}", modality, err);
            err
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AnalysisError::transport(modality, e))?;
        log::debug!("{} detection responded {} ({} bytes)", modality, status, body.len());

        if !status.is_success() {
            let err = match server_message(&body) {
                Some(message) => AnalysisError::Server(message),
                None => AnalysisError::Rejected {
                    modality,
                    status: status.as_u16(),
                },
            };
            log::warn!("{} detection rejected with {}: {:?}", modality, status, err);
            return Err(err);
        }

        decode_result(modality, &body).map_err(|e| {
            log::warn!("Malformed {} detection response: {}", modality, e);
            AnalysisError::Malformed {
                modality,
                detail: e.to_string(),
            }
        })
    }

    fn image_part(file: &ImageFile) -> Part {
        let part = Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string());
        match part.mime_str(file.mime_hint()) {
            Ok(part) => part,
            Err(e) => {
                log::warn!(
                    "Ignoring unusable MIME hint {:?} for {}: {}",
                    file.mime_hint(),
                    file.name(),
                    e
                );
                Part::bytes(file.bytes().to_vec()).file_name(file.name().to_string())
            }
        }
    }
}

#[async_trait]
impl DetectionClient for HttpDetectionClient {
    async fn analyze_text(&self, content: &str) -> Result<AnalysisResult, AnalysisError> {
        let body = DetectTextRequest {
            text: content.to_string(),
        };
        let request = self.http_client.post(&self.text_url).json(&body);
        self.exchange(Modality::Text, request).await
    }

    async fn analyze_image(&self, file: &ImageFile) -> Result<AnalysisResult, AnalysisError> {
        let form = Form::new().part(IMAGE_FIELD, Self::image_part(file));
        let request = self.http_client.post(&self.image_url).multipart(form);
        self.exchange(Modality::Image, request).await
    }
}
