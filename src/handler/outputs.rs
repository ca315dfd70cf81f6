//! Kaggle artifact aggregation endpoint
//!
//! Reads the three precomputed analysis artifacts from disk on every
//! request and serves them as one JSON document. The files are owned by an
//! external analysis run; this module never writes them.

use crate::config::{AppState, ArtifactsConfig};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::fs;

/// Upper bound on the feature names included in a response
pub const MAX_SELECTED_FEATURES: usize = 20;

/// Fixed error message for the missing-artifact case
const MISSING_MESSAGE: &str = "Output files not found";

/// Aggregated response payload
#[derive(Debug, Serialize, PartialEq)]
pub struct KaggleOutputs {
    /// Mutual-information scores, passed through verbatim
    pub mi_scores: Value,
    /// Model comparison metrics, passed through verbatim
    pub model_comparison: Value,
    /// Selected feature names, truncated to the first
    /// [`MAX_SELECTED_FEATURES`] lines in file order
    pub selected_features: Vec<String>,
}

/// Artifact loading failure classes.
///
/// Only `Missing` is translated into a structured response; everything
/// else surfaces as a generic server error.
#[derive(Debug)]
pub enum ArtifactError {
    /// One of the artifact files does not exist
    Missing(String),
    /// A file exists but could not be read or parsed
    Unreadable(String),
}

/// Serve the artifact aggregation route
pub async fn serve_outputs(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    match load_outputs(&state.config.artifacts).await {
        Ok(outputs) => {
            http::build_json_response(StatusCode::OK, &outputs, &state.config.http, is_head)
        }
        Err(ArtifactError::Missing(path)) => {
            logger::log_warning(&format!("Artifact not found: {path}"));
            let body = serde_json::json!({ "error": MISSING_MESSAGE });
            http::build_json_response(StatusCode::NOT_FOUND, &body, &state.config.http, is_head)
        }
        Err(ArtifactError::Unreadable(reason)) => {
            logger::log_error(&format!("Failed to load artifacts: {reason}"));
            http::build_500_response()
        }
    }
}

/// Load and assemble all three artifacts.
///
/// All-or-nothing: the first failure aborts the whole load, so a response
/// never mixes fresh and absent artifacts.
pub async fn load_outputs(artifacts: &ArtifactsConfig) -> Result<KaggleOutputs, ArtifactError> {
    let mi_scores = read_json_artifact(&artifacts.mi_scores_path).await?;
    let model_comparison = read_json_artifact(&artifacts.model_comparison_path).await?;
    let raw_features = read_artifact(&artifacts.selected_features_path).await?;

    Ok(KaggleOutputs {
        mi_scores,
        model_comparison,
        selected_features: parse_selected_features(&raw_features),
    })
}

/// Read an artifact file, classifying the absent-file case
async fn read_artifact(path: &str) -> Result<String, ArtifactError> {
    fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ArtifactError::Missing(path.to_string())
        } else {
            ArtifactError::Unreadable(format!("{path}: {e}"))
        }
    })
}

/// Read and parse a JSON artifact
async fn read_json_artifact(path: &str) -> Result<Value, ArtifactError> {
    let raw = read_artifact(path).await?;
    serde_json::from_str(&raw).map_err(|e| ArtifactError::Unreadable(format!("{path}: {e}")))
}

/// Split newline-delimited feature names, keeping file order.
///
/// Interior blank lines are kept; only the trailing newline is dropped.
fn parse_selected_features(raw: &str) -> Vec<String> {
    raw.lines()
        .take(MAX_SELECTED_FEATURES)
        .map(ToString::to_string)
        .collect()
}
