//! Drives the real strategies against a local stand-in for the
//! chat-completion endpoint and checks both sides of the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use http::{Method, Request};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use book_bites::api::{self, AppState};
use book_bites::openai::OpenAiClient;
use book_bites::summarizer::{strategy_for, StrategyKind};

const BOOK_RECORD: &str = r#"{"title":"1984","author":"George Orwell","dop":"1949-06-08","summary":"Winston Smith quietly rebels against a regime that watches everything, until the Party sets out to cure him of himself.","ecom_url":"https://www.amazon.com/dp/0451524934"}"#;

#[derive(Clone)]
struct MockProvider {
    content: String,
    fail_first: bool,
    calls: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
}

impl MockProvider {
    fn returning(content: &str) -> Self {
        Self {
            content: content.to_string(),
            fail_first: false,
            calls: Arc::new(AtomicUsize::new(0)),
            last_body: Arc::new(Mutex::new(None)),
        }
    }

    fn failing_once(content: &str) -> Self {
        Self {
            fail_first: true,
            ..Self::returning(content)
        }
    }

    fn last_request(&self) -> Value {
        self.last_body
            .lock()
            .unwrap()
            .clone()
            .expect("provider was never called")
    }

    async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/v1/chat/completions", post(complete))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }
}

async fn complete(
    State(mock): State<MockProvider>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    *mock.last_body.lock().unwrap() = Some(body);
    let call = mock.calls.fetch_add(1, Ordering::SeqCst);
    if mock.fail_first && call == 0 {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": mock.content}}]
    }))
    .into_response()
}

fn app_against(base_url: &str, kind: StrategyKind) -> Router {
    let client = OpenAiClient::new(base_url, "test-key", "gpt-4o-mini");
    api::routes(AppState {
        summarizer: strategy_for(kind, client),
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn structured_strategy_round_trip() {
    let mock = MockProvider::returning(BOOK_RECORD);
    let base = mock.spawn().await;
    let app = app_against(&base, StrategyKind::Structured);

    let response = app
        .oneshot(get("/summarize?title=1984&author=George%20Orwell"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "1984");
    assert_eq!(body["author"], "George Orwell");
    assert_eq!(body["dop"], "1949-06-08");
    assert_eq!(body["ecom_url"], "https://www.amazon.com/dp/0451524934");

    let sent = mock.last_request();
    assert_eq!(sent["model"], "gpt-4o-mini");
    assert!(sent["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("librarian"));
    assert_eq!(
        sent["messages"][1]["content"],
        "Tell me about 1984 written by George Orwell"
    );
    assert_eq!(sent["temperature"], 0.0);
    assert_eq!(sent["response_format"]["type"], "json_schema");
    assert_eq!(
        sent["response_format"]["json_schema"]["schema"]["required"],
        json!(["title", "author", "dop", "summary", "ecom_url"])
    );
}

#[tokio::test]
async fn free_text_strategy_round_trip() {
    let mock = MockProvider::returning("Winston Smith rebels against Big Brother.");
    let base = mock.spawn().await;
    let app = app_against(&base, StrategyKind::FreeText);

    let response = app
        .oneshot(get("/summarize?title=1984&author=George%20Orwell"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "Winston Smith rebels against Big Brother."})
    );

    let sent = mock.last_request();
    assert!(sent["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("avid reader"));
    assert_eq!(
        sent["messages"][1]["content"],
        "In less than 100 words, provide a summary of 1984 written by George Orwell"
    );
    let temperature = sent["temperature"].as_f64().unwrap();
    assert!((temperature - 0.1).abs() < 1e-6);
    assert!(sent.get("response_format").is_none());
}

#[tokio::test]
async fn title_suggestions_come_back_as_ordinary_replies() {
    let mock = MockProvider::returning(
        "I could not find that one. Did you mean Nineteen Eighty-Four by George Orwell? \
         Please check the title once again.",
    );
    let base = mock.spawn().await;
    let app = app_against(&base, StrategyKind::FreeText);

    let response = app.oneshot(get("/summarize?title=1985")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Did you mean"));

    // No author given, so none is mentioned in the prompt.
    let sent = mock.last_request();
    assert_eq!(
        sent["messages"][1]["content"],
        "In less than 100 words, provide a summary of 1985"
    );
}

#[tokio::test]
async fn incomplete_record_from_the_provider_is_an_error() {
    let mock = MockProvider::returning(r#"{"title": "1984", "author": "George Orwell"}"#);
    let base = mock.spawn().await;
    let app = app_against(&base, StrategyKind::Structured);

    let response = app.oneshot(get("/summarize?title=1984")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "internal");
}

#[tokio::test]
async fn provider_outage_only_fails_the_affected_request() {
    let mock = MockProvider::failing_once(BOOK_RECORD);
    let base = mock.spawn().await;
    let app = app_against(&base, StrategyKind::Structured);

    let first = app
        .clone()
        .oneshot(get("/summarize?title=1984"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(first).await["code"], "internal");

    let second = app.oneshot(get("/summarize?title=1984")).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["title"], "1984");
    assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
}
