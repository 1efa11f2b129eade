//! Drives the real reqwest transport against an in-process fake of the
//! analysis and auth services.

use std::sync::Arc;

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use cvchecker::analysis::{AnalysisClient, SubmissionController};
use cvchecker::api_client::ReqwestTransport;
use cvchecker::auth::{AuthClient, FileTokenStore, LoginFlow, LoginStep};
use cvchecker::errors::SubmissionError;
use cvchecker::models::form::PDF_CONTENT_TYPE;
use cvchecker::models::{Advice, CvFile};

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Mimics the analysis backend: rejects non-PDF/DOCX uploads with a JSON
/// `detail`, answers HTML for a JD of "html" and a plain-text 500 for "crash".
async fn analyze(mut multipart: Multipart) -> Response {
    let mut content_type = String::new();
    let mut jd_text = String::new();
    let mut send_email = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv" => {
                content_type = field.content_type().unwrap_or_default().to_string();
                field.bytes().await.unwrap();
            }
            "jdText" => jd_text = field.text().await.unwrap(),
            "sendEmail" => send_email = field.text().await.unwrap(),
            _ => {
                field.bytes().await.unwrap();
            }
        }
    }

    if content_type != PDF_CONTENT_TYPE {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Only PDF or DOCX allowed" })),
        )
            .into_response();
    }
    if jd_text == "html" {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }
    if jd_text == "crash" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }

    let mut body = json!({
        "id": "1712000000000",
        "score": 85,
        "breakdown": { "skills": 90, "experience": 80, "education": 70, "extras": 60 },
        "suggestions": ["Add metrics"],
        "pdfPath": "/reports/1712000000000.pdf",
    });
    if send_email == "true" {
        body["emailWarning"] = json!("SMTP credentials missing");
    }
    Json(body).into_response()
}

async fn request_otp(Json(body): Json<Value>) -> Response {
    if body["email"] == "blocked@example.com" {
        return (StatusCode::FORBIDDEN, "email not allowed").into_response();
    }
    Json(json!({ "ok": true })).into_response()
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if body["code"] != "123456" {
        return (StatusCode::BAD_REQUEST, "Invalid or expired code").into_response();
    }
    Json(json!({ "token": "jwt-abc", "user": { "email": body["email"] } })).into_response()
}

fn backend() -> Router {
    Router::new()
        .route("/api/health", get(|| async { Json(json!({ "ok": true })) }))
        .route("/api/analyze", post(analyze))
        .route("/api/auth/request-otp", post(request_otp))
        .route("/api/auth/verify-otp", post(verify_otp))
}

fn pdf() -> CvFile {
    CvFile::new("cv.pdf", PDF_CONTENT_TYPE, &b"%PDF-1.7 resume"[..])
}

async fn analysis_client() -> Arc<AnalysisClient> {
    let base = spawn_server(backend()).await;
    Arc::new(AnalysisClient::new(
        base,
        Arc::new(ReqwestTransport::new().unwrap()),
    ))
}

#[tokio::test]
async fn test_analysis_round_trip() {
    let client = analysis_client().await;
    assert!(client.health().await.unwrap());

    let mut controller = SubmissionController::new(client.clone());
    controller.select_file(Some(pdf()));
    controller.set_job_description("Senior Rust engineer");
    controller.submit().await.unwrap();

    let result = controller.result().unwrap();
    assert_eq!(result.match_score, 85);
    assert_eq!(result.advice(), Advice::StrongFit);
    assert_eq!(result.report_id.as_deref(), Some("1712000000000"));
    assert_eq!(
        result.report_url(client.base_url()),
        Some(format!("{}/reports/1712000000000.pdf", client.base_url()))
    );
    assert_eq!(result.email_warning, None);
}

#[tokio::test]
async fn test_email_copy_warning_is_surfaced() {
    let client = analysis_client().await;
    let mut controller = SubmissionController::new(client);
    controller.select_file(Some(pdf()));
    controller.set_job_description("Senior Rust engineer");
    controller.set_contact_email("me@example.com");
    controller.set_wants_email_copy(true);
    controller.submit().await.unwrap();

    assert_eq!(
        controller.result().unwrap().email_warning.as_deref(),
        Some("SMTP credentials missing")
    );
}

#[tokio::test]
async fn test_server_rejection_detail() {
    let client = analysis_client().await;
    let mut controller = SubmissionController::new(client);
    controller.select_file(Some(CvFile::new("cv.pdf", "text/plain", &b"x"[..])));
    controller.set_job_description("Senior Rust engineer");

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, SubmissionError::Rejected { status: 400, .. }));
    assert_eq!(controller.error(), Some("Only PDF or DOCX allowed"));
}

#[tokio::test]
async fn test_html_success_is_unexpected() {
    let client = analysis_client().await;
    let mut controller = SubmissionController::new(client);
    controller.select_file(Some(pdf()));
    controller.set_job_description("html");

    assert_eq!(
        controller.submit().await.unwrap_err(),
        SubmissionError::MalformedResponse
    );
    assert_eq!(controller.error(), Some("Unexpected response"));
}

#[tokio::test]
async fn test_plain_text_server_error() {
    let client = analysis_client().await;
    let mut controller = SubmissionController::new(client);
    controller.select_file(Some(pdf()));
    controller.set_job_description("crash");

    controller.submit().await.unwrap_err();
    assert_eq!(controller.error(), Some("Internal Server Error"));
}

#[tokio::test]
async fn test_login_persists_token_to_disk() {
    let base = spawn_server(backend()).await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("session.json");

    let auth = AuthClient::new(
        base.clone(),
        Arc::new(ReqwestTransport::new().unwrap()),
        Arc::new(FileTokenStore::new(&token_file)),
    );

    let mut flow = LoginFlow::new();
    flow.set_email("blocked@example.com");
    let err = flow.send_otp(&auth).await.unwrap_err();
    assert_eq!(err.to_string(), "email not allowed");
    assert_eq!(flow.step(), &LoginStep::AwaitingEmail);

    flow.set_email("me@example.com");
    flow.send_otp(&auth).await.unwrap();

    flow.set_code("000000");
    flow.verify(&auth).await.unwrap_err();
    assert_eq!(flow.error(), Some("Invalid or expired code"));

    flow.set_code("123456");
    let user = flow.verify(&auth).await.unwrap().unwrap();
    assert_eq!(user["email"], "me@example.com");

    // a fresh client over the same file sees the token
    let reopened = AuthClient::new(
        base,
        Arc::new(ReqwestTransport::new().unwrap()),
        Arc::new(FileTokenStore::new(&token_file)),
    );
    assert_eq!(reopened.get_token().await.unwrap(), "jwt-abc");

    reopened.set_token("").await.unwrap();
    assert_eq!(auth.get_token().await.unwrap(), "");
}
