//! Speech synthesis for new cards' example phrases.

use crate::config::TtsConfig;
use async_trait::async_trait;
use qa_core::ServiceError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into encoded audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'static str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message { message: String },
    Text(String),
}

/// ElevenLabs streaming text-to-speech client.
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    config: TtsConfig,
}

impl ElevenLabsClient {
    pub fn new(config: TtsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/text-to-speech/{}/stream",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, ServiceError> {
        let request = SpeechRequest {
            text,
            model_id: "eleven_multilingual_v2",
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ServiceError::SpeechSynthesis(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ServiceError::SpeechSynthesis(error_message(status, &body)));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::SpeechSynthesis(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Pull the `detail` message out of an error body when there is one.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { detail: ErrorDetail::Message { message } }) => format!("{status} - {message}"),
        Ok(ErrorBody { detail: ErrorDetail::Text(text) }) => format!("{status} - {text}"),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{status} - {}", body.trim()),
    }
}
