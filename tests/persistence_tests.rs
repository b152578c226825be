//! `HttpSink` against a local stand-in for the clinic backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};

use symptom_dx::persist::http::HttpSink;
use symptom_dx::{
    DiagnosisSession, DiseaseCatalog, PatientId, PersistenceError, SessionError, SessionState,
};

#[derive(Default)]
struct Received {
    body: Option<serde_json::Value>,
    authorization: Option<String>,
}

type Shared = Arc<Mutex<Received>>;

async fn accept(
    State(received): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> StatusCode {
    let mut received = received.lock().unwrap();
    received.body = Some(body);
    received.authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    StatusCode::CREATED
}

async fn fail() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
}

async fn spawn_backend(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_http_sink_posts_backend_payload() {
    let received = Shared::default();
    let router = Router::new()
        .route("/api/diagnostics", post(accept))
        .with_state(received.clone());
    let addr = spawn_backend(router).await;

    let catalog = DiseaseCatalog::load_embedded().unwrap();
    let sink = HttpSink::new(&format!("http://{addr}"), Some("s3cret".to_string())).unwrap();

    let mut session = DiagnosisSession::new(PatientId(12), &catalog);
    session.toggle_symptom("fever").unwrap();
    session.toggle_symptom("cough").unwrap();
    session.analyze().unwrap();
    session.save(&sink).await.unwrap();
    assert_eq!(session.state(), SessionState::Saved);

    let received = received.lock().unwrap();
    assert_eq!(
        received.body,
        Some(serde_json::json!({
            "patient_id": 12,
            "symptomes": ["fever", "cough"],
            "maladie": "Flu",
            "traitements": ["rest", "paracetamol", "hydration"],
        }))
    );
    assert_eq!(received.authorization.as_deref(), Some("Bearer s3cret"));
}

#[tokio::test]
async fn test_http_sink_failure_keeps_session_analyzed() {
    let router = Router::new().route("/api/diagnostics", post(fail));
    let addr = spawn_backend(router).await;

    let catalog = DiseaseCatalog::load_embedded().unwrap();
    let sink = HttpSink::new(&format!("http://{addr}/"), None).unwrap();

    let mut session = DiagnosisSession::new(PatientId(4), &catalog);
    session.toggle_symptom("nausea").unwrap();
    session.analyze().unwrap();

    let err = session.save(&sink).await.unwrap_err();
    match err {
        SessionError::Persistence(PersistenceError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session.state(), SessionState::Analyzed);
    assert!(!session.is_saving());
    assert_eq!(session.result().unwrap().name(), "Type 2 diabetes");
}

#[tokio::test]
async fn test_http_sink_unreachable_backend() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let catalog = DiseaseCatalog::load_embedded().unwrap();
    let sink = HttpSink::new(&format!("http://{addr}"), None).unwrap();

    let mut session = DiagnosisSession::new(PatientId(4), &catalog);
    session.toggle_symptom("pain").unwrap();
    session.analyze().unwrap();

    let err = session.save(&sink).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Persistence(PersistenceError::Http(_))
    ));
    assert_eq!(session.state(), SessionState::Analyzed);
}
