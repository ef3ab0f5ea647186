use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use utoipa::ToSchema;

use crate::openai::{json_schema_format, ChatOptions, OpenAiClient};

const LIBRARIAN_PERSONA: &str = "You are a librarian with an immense knowledge in books. \
    Your task is to present a summary of a given book title along with the author's name. \
    The author name may or may not be given. \
    Note that the user may have given an imaginary title. \
    If so, suggest the right title and request them to check the title once again.";

const READER_PERSONA: &str = "You are an avid reader with a wide knowledge of books and their authors. \
    Your task is to present a short summary of a given book title. \
    The author name may or may not be given. \
    Note that the user may have given an imaginary title. \
    If so, suggest the right title and request them to check the title once again.";

const STRUCTURED_LEAD: &str = "Tell me about";
const FREE_TEXT_LEAD: &str = "In less than 100 words, provide a summary of";

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "title": "The Alchemist",
    "author": "Paulo Coelho",
    "dop": "1988",
    "summary": "Santiago, an Andalusian shepherd, follows a recurring dream to the Egyptian pyramids and learns that the treasure he seeks lies in the journey itself.",
    "ecom_url": "https://www.amazon.com/dp/0061122416"
}))]
pub struct BookBite {
    /// Name of the book
    pub title: String,
    /// Name of the books author
    pub author: String,
    /// Date of publishing the book
    pub dop: String,
    /// Short summary of the book in less than 100 words
    pub summary: String,
    /// Online URL from Amazon to purchase book
    pub ecom_url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FreeTextSummary {
    /// Generated summary text
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum SummaryResult {
    Structured(BookBite),
    FreeText(FreeTextSummary),
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("completion request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("completion service returned status {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("malformed provider response: {reason}")]
    MalformedProviderResponse { reason: String },
}

/// One summarization call against the completion service. Implementations
/// own prompt construction and reply decoding for their output shape.
#[async_trait]
pub trait SummaryStrategy: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, SummarizeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Structured,
    FreeText,
}

impl StrategyKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" => Some(Self::Structured),
            "free-text" | "free_text" | "freetext" => Some(Self::FreeText),
            _ => None,
        }
    }
}

pub fn strategy_for(kind: StrategyKind, client: OpenAiClient) -> Arc<dyn SummaryStrategy> {
    match kind {
        StrategyKind::Structured => Arc::new(StructuredSummaryStrategy::new(client)),
        StrategyKind::FreeText => Arc::new(FreeTextSummaryStrategy::new(client)),
    }
}

/// Constrains the model to a BookBite record and decodes it.
pub struct StructuredSummaryStrategy {
    client: OpenAiClient,
}

impl StructuredSummaryStrategy {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SummaryStrategy for StructuredSummaryStrategy {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, SummarizeError> {
        let prompt = user_prompt(STRUCTURED_LEAD, request);
        let content = self
            .client
            .chat_completion(ChatOptions {
                system: LIBRARIAN_PERSONA,
                user: &prompt,
                temperature: 0.0,
                response_format: Some(json_schema_format("BookBite", book_bite_schema())),
            })
            .await?;

        Ok(SummaryResult::Structured(parse_book_bite(&content)?))
    }
}

/// Accepts unconstrained text and returns it under a `message` key.
pub struct FreeTextSummaryStrategy {
    client: OpenAiClient,
}

impl FreeTextSummaryStrategy {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SummaryStrategy for FreeTextSummaryStrategy {
    async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, SummarizeError> {
        let prompt = user_prompt(FREE_TEXT_LEAD, request);
        let message = self
            .client
            .chat_completion(ChatOptions {
                system: READER_PERSONA,
                user: &prompt,
                temperature: 0.1,
                response_format: None,
            })
            .await?;

        Ok(SummaryResult::FreeText(FreeTextSummary { message }))
    }
}

// The title and author are interpolated as given; the system instruction,
// not input validation, handles imaginary or garbled titles.
fn user_prompt(lead: &str, request: &SummaryRequest) -> String {
    let mut prompt = format!("{lead} {}", request.title);
    if !request.author.is_empty() {
        prompt.push_str(" written by ");
        prompt.push_str(&request.author);
    }
    prompt
}

fn parse_book_bite(content: &str) -> Result<BookBite, SummarizeError> {
    serde_json::from_str(content).map_err(|e| SummarizeError::MalformedProviderResponse {
        reason: format!("completion text is not a book record: {e}"),
    })
}

fn book_bite_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": "Name of the book" },
            "author": { "type": "string", "description": "Name of the books author" },
            "dop": { "type": "string", "description": "Date of publishing the book" },
            "summary": { "type": "string", "description": "Short summary of the book in less than 100 words" },
            "ecom_url": { "type": "string", "description": "Online URL from Amazon to purchase book" }
        },
        "required": ["title", "author", "dop", "summary", "ecom_url"],
        "additionalProperties": false
    })
}
