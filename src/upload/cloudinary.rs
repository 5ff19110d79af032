use crate::error::TransportError;
use crate::selection::PendingFile;
use crate::upload::transport::{ProgressFn, UploadTransport};
use async_trait::async_trait;
use futures::stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: String::new(),
            base_url: "https://api.cloudinary.com".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Unsigned image upload to Cloudinary using an upload preset.
#[derive(Clone)]
pub struct CloudinaryTransport {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryTransport {
    pub fn new(config: CloudinaryConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            TransportError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl UploadTransport for CloudinaryTransport {
    async fn upload(
        &self,
        file: &PendingFile,
        on_progress: &ProgressFn<'_>,
    ) -> Result<String, TransportError> {
        let bytes = file
            .source
            .read()
            .await
            .map_err(|e| TransportError::Source(e.to_string()))?;
        let total = bytes.len() as u64;

        // The body stream reports each chunk as reqwest pulls it.
        let (sent_tx, mut sent_rx) = mpsc::unbounded_channel::<u64>();
        let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let body = Body::wrap_stream(stream::iter(chunks.into_iter().map(move |chunk| {
            let _ = sent_tx.send(chunk.len() as u64);
            Ok::<_, std::io::Error>(chunk)
        })));

        let part = Part::stream_with_length(body, total)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| TransportError::Source(format!("invalid MIME type: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone());

        tracing::debug!(file = %file.name, bytes = total, url = %self.upload_url(), "sending upload");

        let request = self.client.post(self.upload_url()).multipart(form).send();
        tokio::pin!(request);

        let mut sent = 0u64;
        let response = loop {
            tokio::select! {
                result = &mut request => break result,
                Some(n) = sent_rx.recv() => {
                    sent += n;
                    if total > 0 {
                        on_progress(sent as f64 * 100.0 / total as f64);
                    }
                }
            }
        };
        let response = response.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| self.classify(e))?;
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_string());
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response.json::<UploadResponse>().await.map_err(|e| {
            if e.is_decode() {
                TransportError::MalformedResponse(e.to_string())
            } else {
                self.classify(e)
            }
        })?;

        on_progress(100.0);
        Ok(parsed.secure_url)
    }
}
