//! Webhook router tests
//! Run with: cargo test --test webhook_test

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use drivebot::application::handlers::HandlerRegistry;
use drivebot::application::messaging::{CommandDispatcher, HELP_TEXT};
use drivebot::application::services::CommandLog;
use drivebot::domain::entities::CommandStatus;
use drivebot::domain::traits::CommandLogStore;
use drivebot::infrastructure::adapters::twilio::{router, AppState, TwilioMediaFetcher};
use drivebot::infrastructure::drive::LocalDrive;
use drivebot::infrastructure::storage::MemoryLogStore;

struct Harness {
    app: Router,
    store: Arc<MemoryLogStore>,
    drive_dir: tempfile::TempDir,
}

fn harness() -> Harness {
    let drive_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(drive_dir.path().join("Documents/reports")).unwrap();
    std::fs::write(drive_dir.path().join("Documents/a.txt"), b"hello").unwrap();

    let store = Arc::new(MemoryLogStore::new());
    let media = TwilioMediaFetcher::new(None, Duration::from_secs(5)).unwrap();
    let handlers = HandlerRegistry::with_defaults(
        Arc::new(LocalDrive::new(drive_dir.path())),
        Arc::new(media),
        None,
    );
    let dispatcher = CommandDispatcher::new(handlers, CommandLog::new(store.clone()));

    Harness {
        app: router(AppState::new(Arc::new(dispatcher))),
        store,
        drive_dir,
    }
}

fn webhook(form: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn twiml(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        text
    )
}

#[tokio::test]
async fn test_list_replies_with_twiml() {
    let h = harness();
    let response = h
        .app
        .oneshot(webhook("Body=LIST+%2FDocuments&From=whatsapp%3A%2B15550001111&MessageSid=SM1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/xml");
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        body_text(response).await,
        twiml("Files in /Documents:\n- a.txt\n- reports/")
    );

    let entries = h.store.query_recent(10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].command, "LIST");
    assert_eq!(entries[0].status, CommandStatus::Success);
    assert_eq!(entries[0].sender, "whatsapp:+15550001111");
}

#[tokio::test]
async fn test_unknown_verb_gets_help() {
    let h = harness();
    let response = h.app.oneshot(webhook("Body=FOO+bar&From=x&MessageSid=SM2")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, twiml(HELP_TEXT));

    let entries = h.store.query_recent(10).await.unwrap();
    assert_eq!(entries[0].status, CommandStatus::Error);
}

#[tokio::test]
async fn test_missing_argument_is_an_error_reply() {
    let h = harness();
    let response = h.app.oneshot(webhook("Body=MOVE+%2Fa.pdf&From=x&MessageSid=SM3")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("<Message>Error: "));

    let entries = h.store.query_recent(10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, CommandStatus::Error);
}

#[tokio::test]
async fn test_upload_without_media_acknowledges_target() {
    let h = harness();
    let response = h
        .app
        .oneshot(webhook("Body=UPLOAD+%2FReports+file.pdf&From=x&MessageSid=SM4"))
        .await
        .unwrap();

    assert_eq!(
        body_text(response).await,
        twiml("Ready to receive file for upload to /Reports/file.pdf")
    );
    assert!(!h.drive_dir.path().join("Reports/file.pdf").exists());
}

#[tokio::test]
async fn test_upload_with_media_stores_file() {
    let media = Router::new().route("/media/ME0", get(|| async { "%PDF-1.7 test" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, media).await.unwrap();
    });

    let h = harness();
    let form = format!(
        "Body=UPLOAD+%2FReports+file.pdf&From=x&MessageSid=SM5&NumMedia=1&MediaUrl0=http%3A%2F%2F{}%2Fmedia%2FME0&MediaContentType0=application%2Fpdf",
        addr
    );
    let response = h.app.oneshot(webhook(&form)).await.unwrap();

    assert_eq!(
        body_text(response).await,
        twiml("Uploaded /Reports/file.pdf (13 bytes).")
    );
    let stored = std::fs::read(h.drive_dir.path().join("Reports/file.pdf")).unwrap();
    assert_eq!(stored, b"%PDF-1.7 test");
}

#[tokio::test]
async fn test_preflight() {
    let h = harness();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();
    let response = h.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_HEADERS));
}

#[tokio::test]
async fn test_non_form_body_is_rejected() {
    let h = harness();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"Body\":\"LIST /\"}"))
        .unwrap();
    let response = h.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_cors(&response);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["error"].is_string());

    assert!(h.store.query_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logs_endpoint() {
    let h = harness();
    for form in [
        "Body=LIST+%2FDocuments&From=x&MessageSid=SM6",
        "Body=DELETE+%2Fmissing.txt&From=x&MessageSid=SM7",
        "Body=hello&From=x&MessageSid=SM8",
    ] {
        h.app.clone().oneshot(webhook(form)).await.unwrap();
    }

    let request = Request::builder().uri("/logs?limit=2").body(Body::empty()).unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["command"], "HELLO");
    assert_eq!(entries[0]["status"], "error");
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["error"], 2);

    let request = Request::builder().uri("/logs").body(Body::empty()).unwrap();
    let response = h.app.oneshot(request).await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["stats"]["total"], 3);
    assert_eq!(body["stats"]["success"], 1);
}

fn assert_cors(response: &Response) {
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "authorization, x-client-info, apikey, content-type"
    );
}

async fn send(app: Router, method: Method, uri: &str) -> Response {
    let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_cors_on_every_response() {
    let h = harness();

    let response = send(h.app.clone(), Method::GET, "/webhook").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&response);

    let response = send(h.app.clone(), Method::OPTIONS, "/health").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(&response);

    let response = send(h.app.clone(), Method::GET, "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_cors(&response);

    let response = send(h.app.clone(), Method::GET, "/health").await;
    assert_cors(&response);

    let response = send(h.app, Method::OPTIONS, "/logs").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_cors(&response);
}

#[tokio::test]
async fn test_bad_logs_query_is_json_error() {
    let h = harness();
    let response = send(h.app, Method::GET, "/logs?limit=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_cors(&response);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_health() {
    let h = harness();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = h.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}
