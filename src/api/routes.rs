//! Route handlers.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{error, info};

use super::error::ApiError;
use super::AppState;
use crate::document::sink::ChannelSink;
use crate::document::{application_filename, receipt_filename};
use crate::models::worker::{Registration, WorkerRecord};
use crate::AppError;

/// Body of `POST /api/workers/{id}/upload-scan`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanUpload {
    /// Link to the stored scan of the signed form.
    #[serde(default)]
    pub drive_link: Option<String>,
}

/// `GET /health`.
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /api/workers`.
pub async fn list_workers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WorkerRecord>>, ApiError> {
    Ok(Json(state.registry.list().await?))
}

/// `POST /api/workers/register`: persist, then stream the application form.
pub async fn register(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(registration): Json<Registration>,
) -> Result<Response, ApiError> {
    let record = state
        .registry
        .register(registration)
        .await
        .map_err(|err| match err {
            err @ (AppError::LimitReached(_) | AppError::Validation(_)) => ApiError::from(err),
            err => ApiError::generation(err),
        })?;
    stream_application_form(&state, record, request_host(&headers, &state))
        .map_err(ApiError::generation)
}

/// `GET /api/workers/{id}/pdf`.
pub async fn application_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let record = state.registry.get(&id).await?;
    Ok(stream_application_form(&state, record, request_host(&headers, &state))?)
}

/// `GET /api/workers/{id}/receipt`.
pub async fn receipt_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let record = state.registry.get(&id).await?;
    let disposition = attachment(&receipt_filename(&record.form_no))?;
    let (sink, rx) = ChannelSink::channel();
    let compositor = state.compositor.clone();

    tokio::spawn(async move {
        if let Err(err) = compositor.receipt(&record, sink).await {
            error!(form_no = %record.form_no, %err, "receipt render aborted");
        }
    });

    Ok(pdf_response(disposition, rx))
}

/// `POST /api/workers/{id}/upload-scan`.
pub async fn upload_scan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(upload): Json<ScanUpload>,
) -> Result<Json<Value>, ApiError> {
    state
        .registry
        .record_scan(&id, upload.drive_link.as_deref())
        .await
        .map_err(ApiError::action)?;
    Ok(Json(json!({ "success": true, "message": "Verification link saved!" })))
}

/// `Host` header of the request, or the configured public host.
fn request_host(headers: &HeaderMap, state: &AppState) -> String {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map_or_else(|| state.config.public_host.clone(), ToOwned::to_owned)
}

/// `Content-Disposition` for a download, built before any render starts.
fn attachment(filename: &str) -> crate::Result<HeaderValue> {
    HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|err| AppError::Render(format!("invalid download filename {filename:?}: {err}")))
}

fn stream_application_form(
    state: &AppState,
    record: WorkerRecord,
    host: String,
) -> crate::Result<Response> {
    let disposition = attachment(&application_filename(&record.form_no))?;
    let (sink, rx) = ChannelSink::channel();
    let compositor = state.compositor.clone();

    tokio::spawn(async move {
        match compositor.application_form(&record, &host, sink).await {
            Ok(report) => info!(form_no = %record.form_no, photo = ?report.photo, "application form streamed"),
            Err(err) => error!(form_no = %record.form_no, %err, "application form render aborted"),
        }
    });

    Ok(pdf_response(disposition, rx))
}

fn pdf_response(disposition: HeaderValue, rx: UnboundedReceiver<Bytes>) -> Response {
    let chunks = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|chunk| (Ok::<Bytes, std::io::Error>(chunk), rx))
    });

    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(chunks),
    )
        .into_response()
}
