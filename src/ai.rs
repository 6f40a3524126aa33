use log::error;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// What the description field receives when the service cannot deliver.
/// The client shows this string verbatim, so it stays exactly as shipped.
pub const FALLBACK_DESCRIPTION: &str =
    "Не удалось сгенерировать описание. Пожалуйста, попробуйте позже.";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: Option<String>,
}

/// Client for the external text-generation service that drafts task
/// descriptions. The one async boundary in the system.
pub struct DescriptionGenerator {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl DescriptionGenerator {
    pub fn from_config(config: &Config) -> Self {
        // decide which endpoint to call
        let endpoint = if config.ai_use_local {
            config.ai_local_endpoint.clone()
        } else {
            config.ai_remote_endpoint.clone()
        };
        Self {
            endpoint,
            model: config.ai_model.clone(),
            api_key: config.ai_api_key.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Given a task title, produce a description string.
    ///
    /// Never fails from the caller's point of view: connection errors,
    /// non-success statuses and unparsable bodies all collapse into the
    /// fallback string. No retries.
    pub async fn generate(&self, task_title: &str) -> String {
        let prompt = format!(
            "You are a project management assistant. Write a concise, professional task \
             description (in Russian) for a task titled: \"{task_title}\". Include a brief \
             objective and 3-4 bullet points of potential acceptance criteria. Keep it short."
        );
        let url = format!("{}/generate", self.endpoint.trim_end_matches('/'));

        let mut request = self.http_client.post(&url).json(&GenerateRequest {
            model: &self.model,
            prompt,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<GenerateResponse>().await {
                Ok(body) => body.text.unwrap_or_default(),
                Err(e) => {
                    error!("AI response parse error: {}", e);
                    FALLBACK_DESCRIPTION.to_string()
                }
            },
            Ok(resp) => {
                error!("AI service error: {}", resp.status());
                FALLBACK_DESCRIPTION.to_string()
            }
            Err(e) => {
                error!("AI service unreachable: {}", e);
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_service_yields_the_fallback() {
        let config = Config {
            ai_local_endpoint: "http://127.0.0.1:9".to_string(),
            ai_use_local: true,
            ..Config::default()
        };
        let generator = DescriptionGenerator::from_config(&config);

        let description = generator.generate("Plan the sprint").await;
        assert_eq!(description, FALLBACK_DESCRIPTION);
    }
}
