use super::*;
use axum::{body, body::Body, http::Request};
use tower::ServiceExt;

const SAMPLE_PDF: &[u8] = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF";

fn sample_courses() -> Vec<Course> {
    serde_json::from_value(serde_json::json!([
        { "course_id": "CS 1114", "title": "Intro to Software Design", "credits": 3 },
        { "course_id": "MATH 1225", "title": "Calculus of a Single Variable" }
    ]))
    .expect("courses")
}

fn test_app_with_limit(max_upload_bytes: usize) -> Router {
    build_router(Arc::new(AppState {
        filter: AcceptFilter::pdf_only(),
        max_upload_bytes,
        courses: sample_courses(),
    }))
}

fn test_app() -> Router {
    test_app_with_limit(config::DEFAULT_MAX_UPLOAD_BYTES)
}

fn upload_request(query: &str, content_type: Option<&str>, bytes: &[u8]) -> Request<Body> {
    let mut builder = Request::post(format!("/dars/upload?{query}"));
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder
        .body(Body::from(bytes.to_vec()))
        .expect("request")
}

async fn error_code(response: axum::response::Response) -> ErrorCode {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let error: ApiError = serde_json::from_slice(&bytes).expect("api error json");
    error.code
}

#[tokio::test]
async fn root_reports_service_status() {
    let response = test_app()
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let status: ServiceStatus = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(status.message, "CourseMatch AI backend is running");
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = test_app()
        .oneshot(Request::get("/healthz").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), b"ok");
}

#[tokio::test]
async fn courses_route_returns_loaded_catalog() {
    let response = test_app()
        .oneshot(Request::get("/courses").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let courses: Vec<Course> = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(courses, sample_courses());
    assert_eq!(courses[0].extra.get("credits"), Some(&serde_json::json!(3)));
}

#[tokio::test]
async fn pdf_upload_is_acknowledged() {
    let response = test_app()
        .oneshot(upload_request(
            "filename=transcript.pdf&mime_type=application/pdf",
            Some("application/pdf"),
            SAMPLE_PDF,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let receipt: IngestionReceipt = serde_json::from_slice(&bytes).expect("receipt");
    assert_eq!(receipt.filename, "transcript.pdf");
    assert_eq!(receipt.mime_type, "application/pdf");
    assert_eq!(receipt.size_bytes, SAMPLE_PDF.len() as u64);
}

#[tokio::test]
async fn pdf_upload_is_recognised_by_extension_alone() {
    let response = test_app()
        .oneshot(upload_request(
            "filename=audit.PDF",
            Some("application/octet-stream"),
            SAMPLE_PDF,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_document_type_is_unsupported() {
    let response = test_app()
        .oneshot(upload_request(
            "filename=transcript.docx",
            None,
            b"PK\x03\x04 not a pdf",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error_code(response).await, ErrorCode::UnsupportedMediaType);
}

#[tokio::test]
async fn pdf_named_file_without_pdf_header_is_unsupported() {
    let response = test_app()
        .oneshot(upload_request(
            "filename=transcript.pdf",
            None,
            b"definitely not a pdf",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn pdf_named_file_declared_as_text_still_needs_pdf_header() {
    let response = test_app()
        .oneshot(upload_request(
            "filename=transcript.pdf&mime_type=text/plain",
            None,
            b"definitely not a pdf",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(error_code(response).await, ErrorCode::UnsupportedMediaType);
}

#[tokio::test]
async fn pdf_named_file_declared_as_text_is_recorded_as_pdf() {
    let response = test_app()
        .oneshot(upload_request(
            "filename=transcript.pdf&mime_type=text/plain",
            None,
            SAMPLE_PDF,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let receipt: IngestionReceipt = serde_json::from_slice(&bytes).expect("receipt");
    assert_eq!(receipt.mime_type, "application/pdf");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let response = test_app()
        .oneshot(upload_request("filename=transcript.pdf", None, b""))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await, ErrorCode::Validation);
}

#[tokio::test]
async fn missing_or_unsafe_filename_is_rejected() {
    for query in ["", "filename=%20%20", "filename=..%2Fsecret.pdf"] {
        let response = test_app()
            .oneshot(upload_request(query, Some("application/pdf"), SAMPLE_PDF))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query: {query}");
    }

    let long_name = format!("filename={}.pdf", "a".repeat(MAX_FILENAME_BYTES));
    let response = test_app()
        .oneshot(upload_request(&long_name, None, SAMPLE_PDF))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_document_is_rejected() {
    let response = test_app_with_limit(16)
        .oneshot(upload_request("filename=transcript.pdf", None, SAMPLE_PDF))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_code(response).await, ErrorCode::PayloadTooLarge);
}

#[tokio::test]
async fn document_at_the_size_limit_is_accepted() {
    let response = test_app_with_limit(SAMPLE_PDF.len())
        .oneshot(upload_request("filename=transcript.pdf", None, SAMPLE_PDF))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn load_courses_reads_catalog_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sample_dataset.json");
    fs::write(
        &path,
        r#"[{"course_id":"ENGL 1105","title":"First-Year Writing","avg_gpa":3.4}]"#,
    )
    .expect("write catalog");

    let courses = load_courses(&path).expect("courses");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course_id, "ENGL 1105");
}

#[test]
fn load_courses_reports_missing_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_courses(&dir.path().join("missing.json")).expect_err("missing");
    assert!(err.to_string().contains("failed to read course catalog"));
}
