//! Remote classifier client
//!
//! The classifier is an HTTP endpoint taking a multipart form:
//! - `file`: the image bytes (with file name and MIME type)
//! - `lat`, `lon`: optional decimal degrees as text
//!
//! A 2xx response carries a JSON object
//! `{name, category, className, instructions, tip}`. Everything else is a
//! [`ClassifyError`].

use async_trait::async_trait;
use ecoscan_common::{Coordinates, Error, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("EcoScan/", env!("CARGO_PKG_VERSION"));
const FALLBACK_MIME: &str = "application/octet-stream";

/// Classifier transport/protocol errors
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Request construction error: {0}")]
    Request(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! Status: {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Raw classifier response body
///
/// Fields are optional so a partial body still decodes; the normalizer
/// fills gaps with empty strings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ClassifierResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "className")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
}

/// An image chosen by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageUpload {
    /// Build an upload, sniffing the MIME type from the content
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!("Image is empty: {}", file_name)));
        }
        if file_name.is_empty() {
            return Err(Error::InvalidInput("Image file name is empty".to_string()));
        }

        let mime_type = infer::get(&bytes)
            .map(|kind| kind.mime_type())
            .unwrap_or(FALLBACK_MIME)
            .to_string();

        Ok(Self {
            file_name,
            bytes,
            mime_type,
        })
    }

    /// Read an image file from disk
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(file_name, bytes)
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Classification capability
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        image: &ImageUpload,
        coordinates: Option<Coordinates>,
    ) -> std::result::Result<ClassifierResponse, ClassifyError>;
}

/// Classifier reached over HTTP
pub struct HttpClassifier {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Build the multipart body; lat/lon only when coordinates are known
fn build_form(
    image: &ImageUpload,
    coordinates: Option<Coordinates>,
) -> std::result::Result<Form, ClassifyError> {
    let part = Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime_type)
        .map_err(|e| ClassifyError::Request(e.to_string()))?;

    let mut form = Form::new().part("file", part);
    if let Some(coords) = coordinates {
        form = form
            .text("lat", coords.lat.to_string())
            .text("lon", coords.lon.to_string());
    }
    Ok(form)
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        image: &ImageUpload,
        coordinates: Option<Coordinates>,
    ) -> std::result::Result<ClassifierResponse, ClassifyError> {
        let form = build_form(image, coordinates)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            file_name = %image.file_name,
            size_bytes = image.size_bytes(),
            with_location = coordinates.is_some(),
            "Posting image to classifier"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status.as_u16()));
        }

        response
            .json::<ClassifierResponse>()
            .await
            .map_err(|e| ClassifyError::Parse(e.to_string()))
    }
}
