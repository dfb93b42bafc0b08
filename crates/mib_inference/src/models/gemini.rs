use async_trait::async_trait;
use base64::Engine;
use mib_core::{Error, ModelInfo, Result, ValidatedImage, VisionModel};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Config, DEFAULT_MODEL};

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Google AI Studio `generateContent` client.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            api_key: config.api_key,
            model_name: config.model_name,
            base_url: config.base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model_name
        )
    }

    async fn generate_content(&self, parts: Vec<Part<'_>>) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content { role: "user", parts }],
        };

        tracing::debug!("POST {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(Error::Upstream(format!("{}: {}", status, detail)));
        }

        let body: GenerateContentResponse = response.json().await?;
        extract_text(body)
    }
}

fn extract_text(body: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = body.candidates.into_iter().next() else {
        let reason = body
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(Error::Upstream(format!("Prompt blocked: {}", reason)));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    match candidate.finish_reason {
        Some(reason) if text.is_empty() => Err(Error::Upstream(format!(
            "Empty response (finish reason: {})",
            reason
        ))),
        _ => Ok(text),
    }
}

fn display_name(model_name: &str) -> String {
    if model_name == DEFAULT_MODEL {
        "Google Gemini 1.5 Flash".to_string()
    } else {
        format!("Google Gemini ({})", model_name)
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl VisionModel for GeminiModel {
    fn info(&self) -> ModelInfo {
        ModelInfo::new(display_name(&self.model_name), "Google AI Studio")
            .with_cost("FREE")
            .with_daily_limit("100 requests")
    }

    async fn generate(&self, prompt: &str, image: &ValidatedImage) -> Result<String> {
        let payload = image.inline_payload()?;
        let data = base64::engine::general_purpose::STANDARD.encode(&payload.data);

        self.generate_content(vec![
            Part::Text { text: prompt },
            Part::Inline {
                inline_data: InlineData {
                    mime_type: payload.mime_type,
                    data,
                },
            },
        ])
        .await
    }

    async fn probe(&self, prompt: &str) -> Result<String> {
        self.generate_content(vec![Part::Text { text: prompt }]).await
    }
}
