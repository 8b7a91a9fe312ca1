use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::report::ReportRequest;
use crate::error::{AppError, AppResult};
use crate::services::LanguageModelService;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.7;

/// Client for OpenAI-style `/chat/completions` endpoints (DeepSeek by default).
pub struct ChatCompletionsClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    default_prompt: String,
}

impl ChatCompletionsClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        default_prompt: String,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url,
            model,
            default_prompt,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Configuration("API key not configured".to_string()))
    }

    fn completions_endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, request: &ReportRequest) -> ChatRequest {
        let system = format!(
            "You are an assistant that writes concise daily work reports from git history.\n\
             Date: {}\nRepository: {}",
            request.date.format("%Y-%m-%d"),
            request.repo_path.display()
        );

        let mut user = self.default_prompt.clone();
        if let Some(note) = request.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            user.push_str("\nAdditional notes: ");
            user.push_str(note);
        }
        user.push_str("\n\nCommits:\n");
        user.push_str(&request.render_commits());

        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::new("system", system), ChatMessage::new("user", user)],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
impl LanguageModelService for ChatCompletionsClient {
    async fn draft_report(&self, request: &ReportRequest) -> AppResult<String> {
        let api_key = self.api_key()?;
        let body = self.build_request(request);
        debug!(model = %body.model, commits = request.commits.len(), "requesting report");

        let response = self
            .http
            .post(self.completions_endpoint())
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to call model API: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .and_then(|error| error.message)
                .unwrap_or(text);
            return Err(AppError::LanguageModel(format!(
                "model API responded with {status}: {message}"
            )));
        }

        let payload: ChatResponse = response.json().await.map_err(|err| {
            AppError::LanguageModel(format!("failed to parse model response: {err}"))
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::LanguageModel("model returned an empty report".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn new(role: &'static str, content: String) -> Self {
        Self { role, content }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}
