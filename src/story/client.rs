use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};

use super::prompt::{build_prompt, parse_reply};
use super::types::{GenerateRequest, GenerateResponse, StoryIdentification};
use crate::config::Config;
use crate::outcome::Outcome;

/// Maps a free-text plot description to a likely movie.
#[async_trait]
pub trait StoryIdentifier: Send + Sync {
    async fn identify(&self, story: &str, lang: &str) -> Outcome<StoryIdentification>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini reply has no text")]
    EmptyReply,
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, StoryError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.gemini.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(StoryError::Client)?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key().map(str::to_string),
            base_url: config.gemini.base_url.trim_end_matches('/').to_string(),
            model: config.gemini.model.clone(),
        })
    }

    async fn generate(&self, api_key: &str, prompt: String) -> Result<String, StoryError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        );
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        response.text().ok_or(StoryError::EmptyReply)
    }
}

#[async_trait]
impl StoryIdentifier for GeminiClient {
    async fn identify(&self, story: &str, lang: &str) -> Outcome<StoryIdentification> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Outcome::Degraded(StoryIdentification::sample());
        };

        match self.generate(api_key, build_prompt(story, lang)).await {
            Ok(reply) => {
                let outcome = parse_reply(&reply);
                if !outcome.is_success() {
                    info!("Gemini reply was not JSON, using raw text");
                }
                outcome
            }
            Err(e) => {
                error!("Gemini error: {}", e);
                Outcome::Failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, spawn_stub};
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    fn client(base_url: String, api_key: Option<&str>) -> GeminiClient {
        let mut config = Config::default();
        config.gemini.base_url = base_url;
        config.gemini.api_key = api_key.map(str::to_string);
        GeminiClient::new(&config).unwrap()
    }

    fn reply_with(text: &'static str) -> Router {
        Router::new().route(
            "/v1beta/models/:call",
            post(
                move |Path(call): Path<String>,
                      Query(q): Query<HashMap<String, String>>,
                      Json(body): Json<Value>| async move {
                    assert_eq!(call, "gemini-1.5-flash:generateContent");
                    assert_eq!(q.get("key").map(String::as_str), Some("g-key"));
                    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
                    assert!(prompt.contains("Story: two brothers and a lost temple"));
                    Json(json!({
                        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
                    }))
                },
            ),
        )
    }

    #[tokio::test]
    async fn test_no_key_serves_sample() {
        let client = client(dead_url().await, None);
        let out = client.identify("anything", "en").await;
        assert_eq!(out, Outcome::Degraded(StoryIdentification::sample()));
    }

    #[tokio::test]
    async fn test_json_reply_is_success() {
        let base = spawn_stub(reply_with(
            r#"{"movie":"Kantara","category":"South Indian","explanation":"Folklore.","recommendations":["Ulidavaru Kandanthe"],"poster":"","year":2022}"#,
        ))
        .await;
        let out = client(base, Some("g-key"))
            .identify("two brothers and a lost temple", "kn")
            .await;
        assert!(out.is_success());
        let r = out.unwrap_or_default();
        assert_eq!(r.movie(), "Kantara");
        assert_eq!(r.get("recommendations"), Some(&json!(["Ulidavaru Kandanthe"])));
    }

    #[tokio::test]
    async fn test_text_reply_is_degraded() {
        let base = spawn_stub(reply_with("Kantara\nIt is about a temple.")).await;
        let out = client(base, Some("g-key"))
            .identify("two brothers and a lost temple", "en")
            .await;
        match out {
            Outcome::Degraded(r) => {
                assert_eq!(r.movie(), "Kantara");
                assert_eq!(r.explanation(), "Kantara\nIt is about a temple.");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failures() {
        let rejecting = Router::new().route(
            "/v1beta/models/:call",
            post(|| async { (StatusCode::FORBIDDEN, Json(json!({"error": {"code": 403}}))) }),
        );
        let out = client(spawn_stub(rejecting).await, Some("g-key"))
            .identify("x", "en")
            .await;
        assert!(out.is_failure());

        let empty = Router::new().route(
            "/v1beta/models/:call",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let out = client(spawn_stub(empty).await, Some("g-key"))
            .identify("x", "en")
            .await;
        assert!(out.is_failure());

        let out = client(dead_url().await, Some("g-key")).identify("x", "en").await;
        assert_eq!(
            out.resolve(|_| StoryIdentification::ai_error()),
            StoryIdentification::ai_error()
        );
    }
}
