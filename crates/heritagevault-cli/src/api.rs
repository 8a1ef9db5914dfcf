// HTTP client helpers for talking to a HeritageVault server

use anyhow::{anyhow, Result};
use serde_json::Value;

/// Joins the API base URL with a path, tolerating a trailing slash on the
/// base.
pub fn endpoint(api: &str, path: &str) -> String {
    format!("{}/{}", api.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Extracts the server's error message from a failed response, falling back
/// to the HTTP status.
fn server_error(err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(code, response) => {
            let message = response
                .into_json::<Value>()
                .ok()
                .and_then(|body| body["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {code}"));
            anyhow!("server error: {message}")
        }
        other => anyhow!("request failed: {other}"),
    }
}

pub fn list_artifacts(api: &str) -> Result<Vec<Value>> {
    let response = ureq::get(&endpoint(api, "api/artifacts"))
        .call()
        .map_err(server_error)?;
    let artifacts: Vec<Value> = response.into_json()?;
    Ok(artifacts)
}

pub fn get_artifact(api: &str, id: i32) -> Result<Value> {
    let response = ureq::get(&endpoint(api, &format!("api/artifacts/{id}")))
        .call()
        .map_err(server_error)?;
    Ok(response.into_json()?)
}

pub fn verify_artifact(api: &str, id: i32) -> Result<Value> {
    let response = ureq::post(&endpoint(api, &format!("api/artifacts/{id}/verify")))
        .send_json(serde_json::json!({}))
        .map_err(server_error)?;
    Ok(response.into_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("http://localhost:5000", "api/artifacts"),
            "http://localhost:5000/api/artifacts"
        );
        assert_eq!(
            endpoint("http://localhost:5000/", "/api/artifacts"),
            "http://localhost:5000/api/artifacts"
        );
    }
}
