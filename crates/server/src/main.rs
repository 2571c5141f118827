use std::{fs, net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use shared::{
    accept::AcceptFilter,
    domain::{guess_mime, SubmissionId},
    error::{ApiError, ErrorCode},
    protocol::{Course, IngestionReceipt, ServiceStatus, UploadQuery},
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

mod config;

use config::load_settings;

const MAX_FILENAME_BYTES: usize = 180;
const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

struct AppState {
    filter: AcceptFilter,
    max_upload_bytes: usize,
    courses: Vec<Course>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let courses = match load_courses(&settings.courses_path) {
        Ok(courses) => courses,
        Err(error) => {
            warn!(
                path = %settings.courses_path.display(),
                error = %format!("{error:#}"),
                "course catalog unavailable; serving an empty list"
            );
            Vec::new()
        }
    };
    info!(courses = courses.len(), "course catalog loaded");

    let state = AppState {
        filter: AcceptFilter::pdf_only(),
        max_upload_bytes: settings.max_upload_bytes,
        courses,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn load_courses(path: &Path) -> anyhow::Result<Vec<Course>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read course catalog '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse course catalog '{}'", path.display()))
}

fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/courses", get(list_courses))
        .route("/dars/upload", post(upload_document))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        message: "CourseMatch AI backend is running".to_string(),
    })
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_courses(State(state): State<Arc<AppState>>) -> Json<Vec<Course>> {
    Json(state.courses.clone())
}

fn reject(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError::new(code, message)))
}

/// Accepts a raw document body, validates it against the accept filter and
/// acknowledges it. The document is neither parsed nor stored.
async fn upload_document(
    State(state): State<Arc<AppState>>,
    Query(q): Query<UploadQuery>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<IngestionReceipt> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            reject(
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorCode::PayloadTooLarge,
                format!("document exceeds {} bytes", state.max_upload_bytes),
            )
        } else {
            reject(
                rejection.status(),
                ErrorCode::Validation,
                rejection.body_text(),
            )
        }
    })?;
    if body.is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            ErrorCode::Validation,
            "document body cannot be empty",
        ));
    }

    let filename = q
        .filename
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            reject(
                StatusCode::BAD_REQUEST,
                ErrorCode::Validation,
                "filename is required",
            )
        })?;
    if filename.len() > MAX_FILENAME_BYTES {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            ErrorCode::Validation,
            "filename is too long",
        ));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            ErrorCode::Validation,
            "filename must not contain path separators",
        ));
    }

    let declared_mime = q
        .mime_type
        .as_deref()
        .or_else(|| {
            headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
        })
        .map(|mime| mime.trim().to_ascii_lowercase())
        .filter(|mime| !mime.is_empty() && mime != "application/octet-stream");

    if !state.filter.accepts(filename, declared_mime.as_deref()) {
        return Err(reject(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::UnsupportedMediaType,
            format!("only {} documents are accepted", state.filter.label),
        ));
    }

    // A `.pdf` name claims PDF content whatever MIME type was declared.
    let claims_pdf = state
        .filter
        .rules
        .iter()
        .filter(|rule| rule.mime_pattern == PDF_MIME)
        .any(|rule| rule.matches(filename, declared_mime.as_deref()));
    if claims_pdf && !body.starts_with(PDF_MAGIC) {
        return Err(reject(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorCode::UnsupportedMediaType,
            "document content is not a PDF",
        ));
    }

    let mime_type = if claims_pdf {
        PDF_MIME.to_string()
    } else {
        declared_mime
            .or_else(|| guess_mime(filename))
            .unwrap_or_else(|| "application/octet-stream".to_string())
    };

    let receipt = IngestionReceipt {
        submission_id: SubmissionId::new(),
        filename: filename.to_string(),
        mime_type,
        size_bytes: body.len() as u64,
        received_at: Utc::now(),
    };
    info!(
        submission_id = %receipt.submission_id,
        file = %receipt.filename,
        size_bytes = receipt.size_bytes,
        "document received"
    );
    Ok(Json(receipt))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
