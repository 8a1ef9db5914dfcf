//! Upload relay to the external pinning service.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use heritagevault_hash::json_digest;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Response for a relayed upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub cid: String,
    pub url: String,
    pub metadata_hash: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// POST /api/upload
///
/// Relays a multipart `file` to the pinning service. Any additional text
/// fields become the pin's key/value metadata, whose canonical digest is
/// returned alongside the content identifier. A service failure is fatal
/// for the request; nothing is retried.
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let pinning = state
        .pinning
        .as_ref()
        .ok_or_else(|| AppError::Upstream("pinning service is not configured".to_string()))?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut keyvalues = serde_json::Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name == "file" {
            let filename = field
                .file_name()
                .filter(|f| !f.is_empty())
                .unwrap_or("upload.bin")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read file: {e}")))?;
            file = Some((filename, bytes.to_vec()));
        } else if !field_name.is_empty() {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("invalid field '{field_name}': {e}")))?;
            keyvalues.insert(field_name, serde_json::Value::String(value));
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::Validation("file field is required".to_string()))?;
    let metadata = serde_json::Value::Object(keyvalues);

    let metadata_hash = json_digest(&metadata)
        .map_err(|e| AppError::Internal(format!("failed to hash metadata: {e}")))?;
    let pinned = pinning.pin(bytes, &filename, &metadata).await?;

    Ok(Json(UploadResponse {
        cid: pinned.cid,
        url: pinned.url,
        metadata_hash,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_serializes_camel_case() {
        let response = UploadResponse {
            cid: "QmTest".to_string(),
            url: "https://gateway.pinata.cloud/ipfs/QmTest".to_string(),
            metadata_hash: "ab".repeat(32),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"cid\":\"QmTest\""));
        assert!(json.contains("\"metadataHash\""));
    }
}
