use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::core::config::ClassifierConfig;
use crate::core::error::{AppError, Result};

/// Prompt sent alongside the photo. The model is asked for a bare category
/// name, but the keyword mapping downstream tolerates any prose it returns.
const CLASSIFY_PROMPT: &str = "Analyze this image of a civic issue and classify it into exactly \
     one of the following categories: \"Pothole\", \"Streetlight\", \"Trash\", \
     \"WaterLeakage\", or \"Other\". Provide only the category name as your answer.";

/// Vision backend that turns an image into a textual description.
///
/// The trait seam keeps the external call swappable; tests drive the
/// classification flow with a canned implementation.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn describe_image(&self, image: &[u8], media_type: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini-backed image classifier
pub struct GeminiClassifier {
    config: ClassifierConfig,
    http_client: reqwest::Client,
}

impl GeminiClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl ImageClassifier for GeminiClassifier {
    async fn describe_image(&self, image: &[u8], media_type: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_url, self.config.model, self.config.api_key
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: CLASSIFY_PROMPT.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: media_type.to_string(),
                            data: BASE64.encode(image),
                        },
                    },
                ],
            }],
        };

        tracing::debug!(model = %self.config.model, "Sending image to classifier");

        let response = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Classifier request failed: {}", e);
                AppError::ClassificationUnavailable(format!("Classifier request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Classifier returned HTTP {}: {}", status, body);
            return Err(AppError::ClassificationUnavailable(format!(
                "Classifier returned HTTP {}",
                status
            )));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse classifier response: {}", e);
            AppError::ClassificationUnavailable(format!(
                "Failed to parse classifier response: {}",
                e
            ))
        })?;

        let text = payload
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        tracing::debug!(response = %text, "Classifier responded");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_extracts_text() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Pothole" } ] } }
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates[0].content.parts[0].text, "Pothole");
    }

    #[test]
    fn test_response_parsing_tolerates_missing_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "describe".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".to_string(),
                            data: "aGVsbG8=".to_string(),
                        },
                    },
                ],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "describe");
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/jpeg"
        );
    }
}
