//! Client for the external content-addressed pinning service.
//!
//! Uploaded files are relayed to Pinata, which returns the content
//! identifier the catalog records. There is no local durability beyond what
//! the service provides, and failed pins are not retried; the error
//! surfaces to the caller of that one request.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::PinataConfig;

const PIN_FILE_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const GATEWAY_BASE: &str = "https://gateway.pinata.cloud/ipfs";

/// Upper bound on a single pin request, covering connect and transfer.
const PIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Pinning service error.
#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("pinning request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("pinning service rejected the upload ({status}): {body}")]
    Service { status: u16, body: String },
}

/// Result of a successful pin.
#[derive(Debug, Clone)]
pub struct PinnedFile {
    /// Content identifier assigned by the service.
    pub cid: String,
    /// Public gateway URL for the pinned content.
    pub url: String,
}

/// A content-addressed pinning collaborator.
#[async_trait]
pub trait PinningClient: Send + Sync {
    async fn pin(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        metadata: &serde_json::Value,
    ) -> Result<PinnedFile, PinError>;
}

/// Pinning client backed by the Pinata HTTP API.
pub struct PinataClient {
    http: reqwest::Client,
    config: PinataConfig,
}

#[derive(Deserialize)]
struct PinataResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl PinataClient {
    pub fn new(config: PinataConfig) -> Result<Self, PinError> {
        let http = reqwest::Client::builder().timeout(PIN_TIMEOUT).build()?;
        Ok(Self { http, config })
    }
}

/// Builds the `pinataMetadata` body field: display name plus the free-form
/// key/value pairs attached to the upload.
fn pinata_metadata(filename: &str, keyvalues: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "name": filename,
        "keyvalues": keyvalues,
    })
}

pub fn gateway_url(cid: &str) -> String {
    format!("{GATEWAY_BASE}/{cid}")
}

#[async_trait]
impl PinningClient for PinataClient {
    async fn pin(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        metadata: &serde_json::Value,
    ) -> Result<PinnedFile, PinError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text(
                "pinataMetadata",
                pinata_metadata(filename, metadata).to_string(),
            );

        let response = self
            .http
            .post(PIN_FILE_ENDPOINT)
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.api_secret)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PinataResponse = response.json().await?;
        let url = gateway_url(&parsed.ipfs_hash);
        tracing::info!(cid = %parsed.ipfs_hash, "file pinned");

        Ok(PinnedFile {
            cid: parsed.ipfs_hash,
            url,
        })
    }
}
