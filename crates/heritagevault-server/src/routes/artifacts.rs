//! Artifact catalog endpoints: listing, upload and content verification.

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use heritagevault_hash::{metadata_hash, verification_hash, ArtifactKind, ArtifactMetadata};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Artifact, NewArtifact, NewUser, User};
use crate::routes::DEMO_USER_ID;
use crate::state::AppState;

/// Maximum accepted upload size (fields + image bytes).
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// JSON request body for creating an artifact without image bytes.
///
/// Everything is optional at the serde layer so required-field checks can
/// produce 400s with field names in the message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtifactRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub origin: Option<String>,
    /// Accepted as a JSON number or a numeric string.
    pub price: Option<serde_json::Value>,
    pub image_url: Option<String>,
}

/// Request body for the verify endpoint. Hashes a client may supply to
/// cross-check its own copy; they never replace the recorded values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub verification_hash: Option<String>,
    pub metadata_hash: Option<String>,
}

/// Response for the verify endpoint: the (possibly updated) record plus the
/// outcome of the digest comparison.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(flatten)]
    pub artifact: Artifact,
    pub matched: bool,
    pub message: String,
}

/// Creates the artifacts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_artifacts).post(create_artifact))
        .route("/{id}", get(show_artifact))
        .route("/{id}/verify", post(verify_artifact))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// GET /api/artifacts
///
/// All artifacts in insertion order.
async fn list_artifacts(State(state): State<AppState>) -> Result<Json<Vec<Artifact>>, AppError> {
    Ok(Json(state.storage.artifacts().await?))
}

/// GET /api/artifacts/{id}
async fn show_artifact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Artifact>, AppError> {
    let artifact = state
        .storage
        .artifact(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artifact {id} not found")))?;
    Ok(Json(artifact))
}

/// POST /api/artifacts
///
/// Accepts either a multipart form (descriptive fields plus an `image`
/// file) or a JSON body. The multipart path stores the image bytes and
/// records both content digests; a JSON-created record carries no digests
/// and can never pass verification.
async fn create_artifact(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Artifact>), AppError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);

    let artifact = if is_multipart {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?;
        create_from_multipart(&state, multipart).await?
    } else {
        let Json(body) = Json::<CreateArtifactRequest>::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))?;
        create_from_json(&state, body).await?
    };

    Ok((StatusCode::CREATED, Json(artifact)))
}

async fn create_from_json(
    state: &AppState,
    body: CreateArtifactRequest,
) -> Result<Artifact, AppError> {
    let name = require_field(body.name, "name")?;
    let description = require_field(body.description, "description")?;
    let kind = parse_kind(&require_field(body.kind, "type")?)?;
    let origin = require_field(body.origin, "origin")?;
    let price = parse_price(
        &body
            .price
            .ok_or_else(|| AppError::Validation("price is required".to_string()))?,
    )?;

    let image_url = body
        .image_url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| placeholder_image_url(&name));

    let owner = demo_owner(state).await?;
    let artifact = state
        .storage
        .create_artifact(NewArtifact {
            name,
            description,
            kind,
            origin,
            price,
            image_url,
            image_path: None,
            verification_hash: None,
            metadata_hash: None,
            owner_id: owner.id,
        })
        .await?;

    tracing::info!(id = artifact.id, "artifact created without image bytes");
    Ok(artifact)
}

async fn create_from_multipart(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<Artifact, AppError> {
    let mut name = None;
    let mut description = None;
    let mut kind = None;
    let mut origin = None;
    let mut price = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => {
                let filename = field
                    .file_name()
                    .filter(|f| !f.is_empty())
                    .unwrap_or("image")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read image: {e}")))?;
                image = Some((filename, bytes.to_vec()));
            }
            "name" | "description" | "type" | "origin" | "price" => {
                let value = field.text().await.map_err(|e| {
                    AppError::Validation(format!("invalid field '{field_name}': {e}"))
                })?;
                match field_name.as_str() {
                    "name" => name = Some(value),
                    "description" => description = Some(value),
                    "type" => kind = Some(value),
                    "origin" => origin = Some(value),
                    _ => price = Some(value),
                }
            }
            _ => {}
        }
    }

    let name = require_field(name, "name")?;
    let description = require_field(description, "description")?;
    let kind = parse_kind(&require_field(kind, "type")?)?;
    let origin = require_field(origin, "origin")?;
    let price = parse_price(&serde_json::Value::String(require_field(price, "price")?))?;
    let (filename, bytes) =
        image.ok_or_else(|| AppError::Validation("image file is required".to_string()))?;

    let metadata = ArtifactMetadata {
        name: name.clone(),
        description: description.clone(),
        kind,
        origin: origin.clone(),
        price,
    };
    let recorded_metadata_hash = metadata_hash(&metadata)
        .map_err(|e| AppError::Internal(format!("failed to hash metadata: {e}")))?;
    let recorded_verification_hash = verification_hash(&metadata, &bytes)
        .map_err(|e| AppError::Internal(format!("failed to hash content: {e}")))?;

    let stored_name = stored_file_name(&filename);
    tokio::fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(|e| AppError::Internal(format!("failed to create uploads dir: {e}")))?;
    tokio::fs::write(state.uploads_dir.join(&stored_name), &bytes)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store image: {e}")))?;

    let owner = demo_owner(state).await?;
    let artifact = state
        .storage
        .create_artifact(NewArtifact {
            name,
            description,
            kind,
            origin,
            price,
            image_url: format!("/uploads/{stored_name}"),
            image_path: Some(stored_name),
            verification_hash: Some(recorded_verification_hash),
            metadata_hash: Some(recorded_metadata_hash),
            owner_id: owner.id,
        })
        .await?;

    tracing::info!(id = artifact.id, "artifact created with recorded digests");
    Ok(artifact)
}

/// POST /api/artifacts/{id}/verify
///
/// Recomputes the artifact's digests from the stored metadata and image
/// copy and compares them against the values recorded at upload time. The
/// caller may additionally supply its own hashes to check a local copy, but
/// the recorded values are never overwritten and the verified flag is never
/// downgraded; a mismatch is reported as `matched: false`, not an error.
async fn verify_artifact(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    request: Request,
) -> Result<Json<VerifyResponse>, AppError> {
    let request = verify_request_body(request).await?;

    let artifact = state
        .storage
        .artifact(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("artifact {id} not found")))?;

    let recorded = artifact.verification_hash.as_deref().ok_or_else(|| {
        AppError::Validation(
            "artifact was created without image bytes and has no recorded digests".to_string(),
        )
    })?;
    let image_path = artifact.image_path.as_deref().ok_or_else(|| {
        AppError::Validation("artifact has no stored image to verify against".to_string())
    })?;

    let bytes = tokio::fs::read(state.uploads_dir.join(image_path))
        .await
        .map_err(|e| AppError::Internal(format!("failed to read stored image: {e}")))?;

    let metadata = artifact.metadata();
    let recomputed = verification_hash(&metadata, &bytes)
        .map_err(|e| AppError::Internal(format!("failed to hash content: {e}")))?;
    let recomputed_metadata = metadata_hash(&metadata)
        .map_err(|e| AppError::Internal(format!("failed to hash metadata: {e}")))?;

    let matched = digests_match(recorded, &recomputed, request.verification_hash.as_deref())
        && artifact.metadata_hash.as_deref().map_or(true, |rec| {
            digests_match(rec, &recomputed_metadata, request.metadata_hash.as_deref())
        });

    let artifact = if matched && !artifact.verified {
        state
            .storage
            .mark_verified(id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("artifact {id} not found")))?
    } else {
        artifact
    };

    let message = if matched {
        "artifact content matches the recorded digests".to_string()
    } else {
        "artifact content does not match the recorded digests".to_string()
    };

    Ok(Json(VerifyResponse {
        artifact,
        matched,
        message,
    }))
}

/// The verify body is optional: an absent or empty body means "check the
/// record against itself" with no client-side digests to cross-check.
async fn verify_request_body(request: Request) -> Result<VerifyRequest, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_UPLOAD_BYTES)
        .await
        .map_err(|e| AppError::Validation(format!("failed to read request body: {e}")))?;
    if bytes.is_empty() {
        return Ok(VerifyRequest::default());
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))
}

/// A recomputed digest passes when it equals the recorded value and, if the
/// caller supplied its own digest, that one as well.
fn digests_match(recorded: &str, recomputed: &str, client_supplied: Option<&str>) -> bool {
    recomputed == recorded && client_supplied.map_or(true, |supplied| supplied == recomputed)
}

fn require_field(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

fn parse_kind(raw: &str) -> Result<ArtifactKind, AppError> {
    raw.parse()
        .map_err(|e: heritagevault_hash::UnknownKind| AppError::Validation(e.to_string()))
}

/// Accepts a price as a JSON number or a numeric string.
fn parse_price(value: &serde_json::Value) -> Result<i64, AppError> {
    match value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| AppError::Validation("price must be an integer".to_string())),
        serde_json::Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("price must be an integer, got '{s}'"))),
        _ => Err(AppError::Validation(
            "price must be an integer".to_string(),
        )),
    }
}

fn placeholder_image_url(name: &str) -> String {
    format!("https://placehold.co/600x600/1a1a2e/00e5ff?text={name}")
}

/// Random-prefixed file name for the stored upload copy, so two uploads of
/// `batik.png` never collide.
fn stored_file_name(original: &str) -> String {
    let mut prefix = [0u8; 8];
    rand::thread_rng().fill(&mut prefix);
    format!("{}-{}", hex::encode(prefix), sanitize_file_name(original))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.trim_matches('-').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

async fn demo_owner(state: &AppState) -> Result<User, AppError> {
    if let Some(user) = state.storage.user(DEMO_USER_ID).await? {
        return Ok(user);
    }
    // Nobody has logged in yet; register the demo account so uploads have
    // an owner to reference.
    Ok(state
        .storage
        .create_user(NewUser {
            username: "curator".to_string(),
            password: "heritage".to_string(),
        })
        .await?)
}
