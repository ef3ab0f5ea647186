use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::summarizer::SummarizeError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

/// One chat-completion call: fixed system instruction, user prompt, sampling
/// temperature, and an optional structured-output constraint.
pub struct ChatOptions<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub response_format: Option<Value>,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub async fn chat_completion(&self, opts: ChatOptions<'_>) -> Result<String, SummarizeError> {
        let body = chat_body(&self.model, opts);

        let url = format!("{}/chat/completions", self.base_url);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(SummarizeError::ServiceError { status, body });
        }

        let completion: ChatCompletion =
            res.json()
                .await
                .map_err(|e| SummarizeError::MalformedProviderResponse {
                    reason: format!("completion payload did not decode: {e}"),
                })?;

        answer_text(completion)
    }
}

pub fn json_schema_format(name: &str, schema: Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": { "name": name, "schema": schema }
    })
}

fn chat_body(model: &str, opts: ChatOptions<'_>) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": opts.system},
            {"role": "user", "content": opts.user}
        ],
        "temperature": opts.temperature,
    });
    if let Some(format) = opts.response_format {
        body["response_format"] = format;
    }
    body
}

fn answer_text(completion: ChatCompletion) -> Result<String, SummarizeError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SummarizeError::MalformedProviderResponse {
            reason: "completion carried no message content".to_string(),
        })
}
