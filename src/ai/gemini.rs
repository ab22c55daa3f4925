//! Gemini REST client.
//!
//! Calls `POST {base_url}/models/{model}:generateContent` with the API key in
//! the `x-goog-api-key` header. Text requests carry the system instruction and
//! temperature; vision requests send the image inline followed by the prompt.

use super::{Advisor, PlanImage};
use crate::{
    config::ai::AiConfig,
    errors::{Error, Result},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

// ============================================================================
// Request building and response parsing
// ============================================================================

fn text_request(system_instruction: &str, query: &str, temperature: f32) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Some(Content {
            role: None,
            parts: vec![Part::text(system_instruction)],
        }),
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part::text(query)],
        }],
        generation_config: Some(GenerationConfig { temperature }),
    }
}

fn vision_request(image: &PlanImage, prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: None,
        contents: vec![Content {
            role: Some("user"),
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.to_base64(),
                    }),
                },
                Part::text(prompt),
            ],
        }],
        generation_config: None,
    }
}

/// Concatenated text parts of the first candidate; empty when there are none.
fn response_text(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body).map_err(|e| Error::Ai {
        message: format!("Failed to parse Gemini response: {e}"),
    })?;

    Ok(parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default())
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body).map_or_else(
        |_| format!("Gemini returned {status}: {body}"),
        |parsed| format!("Gemini returned {status}: {}", parsed.error.message),
    )
}

// ============================================================================
// Client
// ============================================================================

/// [`Advisor`] backed by the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiAdvisor {
    client: reqwest::Client,
    config: AiConfig,
}

impl GeminiAdvisor {
    /// Builds an HTTP client with the configured timeout.
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    async fn generate(&self, request: &GenerateContentRequest) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| Error::Ai {
            message: "GEMINI_API_KEY is not set".to_string(),
        })?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Ai {
                message: error_message(status.as_u16(), &body),
            });
        }

        response_text(&body)
    }
}

#[async_trait]
impl Advisor for GeminiAdvisor {
    async fn complete_text(&self, system_instruction: &str, query: &str) -> Result<String> {
        let request = text_request(system_instruction, query, self.config.temperature);
        self.generate(&request).await
    }

    async fn complete_vision(&self, image: &PlanImage, prompt: &str) -> Result<String> {
        let request = vision_request(image, prompt);
        self.generate(&request).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_request_shape() {
        let request = text_request("Você é engenheiro.", "Qual o BDI típico?", 0.7);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["systemInstruction"]["parts"][0]["text"],
            "Você é engenheiro."
        );
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Qual o BDI típico?");
        let temperature = value["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_vision_request_shape() {
        let image = PlanImage::jpeg(vec![0xFF, 0xD8, 0xFF]);
        let value = serde_json::to_value(vision_request(&image, "Liste as paredes.")).unwrap();

        assert!(value.get("systemInstruction").is_none());
        assert!(value.get("generationConfig").is_none());
        let parts = &value["contents"][0]["parts"];
        assert_eq!(
            parts[0],
            json!({"inlineData": {"mimeType": "image/jpeg", "data": "/9j/"}})
        );
        assert_eq!(parts[1], json!({"text": "Liste as paredes."}));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"BDI "},{"text":"de 25%."}]}}]}"#;
        assert_eq!(response_text(body).unwrap(), "BDI de 25%.");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        assert_eq!(response_text(r#"{"candidates":[]}"#).unwrap(), "");
        assert_eq!(response_text("{}").unwrap(), "");
        assert_eq!(
            response_text(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap(),
            ""
        );
    }

    #[test]
    fn test_malformed_response_is_an_error() {
        assert!(matches!(response_text("not json"), Err(Error::Ai { .. })));
    }

    #[test]
    fn test_error_message_uses_api_detail() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(400, body), "Gemini returned 400: API key not valid.");
        assert_eq!(error_message(502, "Bad Gateway"), "Gemini returned 502: Bad Gateway");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let advisor = GeminiAdvisor::new(AiConfig::default()).unwrap();
        let result = advisor.complete_text("sistema", "pergunta").await;
        assert!(matches!(result, Err(Error::Ai { .. })));
    }

    #[test]
    fn test_endpoint() {
        let advisor = GeminiAdvisor::new(AiConfig::default()).unwrap();
        assert_eq!(
            advisor.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
