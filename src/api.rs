use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::samples;
use crate::summarizer::{
    BookBite, FreeTextSummary, SummaryRequest, SummaryResult, SummaryStrategy,
};

pub const GREETING: &str = "Hello there! How can I help?";

#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<dyn SummaryStrategy>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/summarize", get(summarize))
        .route("/docs", get(api_docs))
        .fallback(not_found)
        .with_state(Arc::new(state))
}

// -------------------------------------------------------------------
// Handlers

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = Greeting))
)]
async fn home() -> Json<Greeting> {
    Json(Greeting {
        message: GREETING.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/summarize",
    params(SummaryParams),
    responses((
        status = 200,
        description = "Success",
        body = SummaryResult,
        example = json!({ "message": samples::ALCHEMIST_SUMMARY })
    ))
)]
async fn summarize(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResult>, ApiError> {
    let request = SummaryRequest {
        title: params.title,
        author: params.author.unwrap_or_default(),
    };

    let result = state.summarizer.summarize(&request).await.map_err(|e| {
        tracing::error!("summarization failed: {e}");
        ApiError::internal(e)
    })?;

    Ok(Json(result))
}

async fn not_found() -> ApiError {
    ApiError::not_found("not_found", "Not found")
}

// -------------------------------------------------------------------
// Docs

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Your personal book summarizer",
        description = "Looking for your next read? Give us a title and we'll give you a sneak peek.",
        version = "1.0.0"
    ),
    paths(home, summarize),
    components(schemas(Greeting, BookBite, FreeTextSummary, SummaryResult))
)]
struct ApiDoc;

async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// -------------------------------------------------------------------
// Shared DTOs & errors

#[derive(Serialize, ToSchema)]
struct Greeting {
    #[schema(example = "Hello there! How can I help?")]
    message: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct SummaryParams {
    /// Title of the book to summarize
    #[serde(default)]
    #[param(example = "The Alchemist")]
    title: String,
    /// Author of the book, if known
    #[param(example = "Paulo Coelho")]
    author: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
    fn not_found(code: &'static str, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, msg)
    }
    fn internal(e: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorBody {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
