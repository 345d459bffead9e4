use std::env;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::output::parse_structured;
use super::prompts;
use super::types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    NormalizeInput, NormalizeOutput, Part, SynthesizeInput, SynthesizeOutput,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey")]
    ApiKeyNotSet,

    #[error("API key rejected or permission denied: {0}")]
    Auth(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Billing is not enabled for this API key: {0}")]
    Billing(String),

    #[error("API rate limit exceeded. Please retry later.")]
    RateLimited,

    #[error("API quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
}

impl GeminiError {
    /// True when the error means the backend cannot work at all with the current
    /// credentials or model selection, as opposed to a failed call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GeminiError::ApiKeyNotSet
                | GeminiError::Auth(_)
                | GeminiError::ModelNotFound(_)
                | GeminiError::Billing(_)
        )
    }
}

/// The two structured generative calls the search pipeline depends on.
/// Implemented by `GeminiClient` for production; mock implementations used in tests.
// Calls are joined on the caller's task, so the futures carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait GenerativeBackend {
    async fn normalize(&self, input: &NormalizeInput) -> Result<NormalizeOutput, GeminiError>;

    async fn synthesize(&self, input: &SynthesizeInput)
    -> Result<SynthesizeOutput, GeminiError>;
}

/// An absent backend answers every call with `ApiKeyNotSet`.
impl<B: GenerativeBackend> GenerativeBackend for Option<B> {
    async fn normalize(&self, input: &NormalizeInput) -> Result<NormalizeOutput, GeminiError> {
        match self {
            Some(backend) => backend.normalize(input).await,
            None => Err(GeminiError::ApiKeyNotSet),
        }
    }

    async fn synthesize(
        &self,
        input: &SynthesizeInput,
    ) -> Result<SynthesizeOutput, GeminiError> {
        match self {
            Some(backend) => backend.synthesize(input).await,
            None => Err(GeminiError::ApiKeyNotSet),
        }
    }
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_env(http: Client) -> Result<Self, GeminiError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| GeminiError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(GeminiError::ApiKeyNotSet);
        }
        let model = env::var("GEMINI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            model,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }

    async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<T, GeminiError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
                role: Some("user".to_string()),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
                temperature: 0.2,
            },
        };

        debug_assert!(
            url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key.0)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<GenerateContentResponse>(&text)
                && let Some(err) = &body.error
            {
                let classified = classify_api_error(status, err);
                warn!(error = %classified, "Gemini API error");
                return Err(classified);
            }
            let classified = classify_status(status, &text);
            warn!(status = %status, "Gemini API error (no structured body)");
            return Err(classified);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::MalformedOutput(e.to_string()))?;
        debug!(model = %self.model, "gemini generation complete");

        if let Some(err) = &body.error {
            let classified = classify_api_error(status, err);
            warn!(error = %classified, "Gemini API error in 200 response");
            return Err(classified);
        }

        parse_structured(&body)
    }
}

impl GenerativeBackend for GeminiClient {
    async fn normalize(&self, input: &NormalizeInput) -> Result<NormalizeOutput, GeminiError> {
        self.generate_structured(prompts::normalize_prompt(input), prompts::normalize_schema())
            .await
    }

    async fn synthesize(
        &self,
        input: &SynthesizeInput,
    ) -> Result<SynthesizeOutput, GeminiError> {
        self.generate_structured(
            prompts::synthesize_prompt(input),
            prompts::synthesize_schema(),
        )
        .await
    }
}

fn classify_status(status: StatusCode, body: &str) -> GeminiError {
    let snippet = if body.len() > 200 {
        &body[..body.floor_char_boundary(200)]
    } else {
        body
    };
    let message = format!("HTTP {status}: {snippet}");
    match status.as_u16() {
        401 | 403 => GeminiError::Auth(message),
        404 => GeminiError::ModelNotFound(message),
        429 => GeminiError::RateLimited,
        code => GeminiError::Api { code, message },
    }
}

fn classify_api_error(http_status: StatusCode, err: &ApiError) -> GeminiError {
    let message = err
        .message
        .clone()
        .unwrap_or_else(|| "Unknown error".to_string());

    let key_invalid = err
        .details
        .iter()
        .any(|d| matches!(d.reason.as_deref(), Some("API_KEY_INVALID" | "API_KEY_EXPIRED")));
    if key_invalid {
        return GeminiError::Auth(message);
    }

    match err.status.as_deref() {
        Some("UNAUTHENTICATED" | "PERMISSION_DENIED") => return GeminiError::Auth(message),
        Some("NOT_FOUND") => return GeminiError::ModelNotFound(message),
        Some("FAILED_PRECONDITION") => return GeminiError::Billing(message),
        Some("RESOURCE_EXHAUSTED") => return GeminiError::QuotaExhausted(message),
        _ => {}
    }

    let code = err
        .code
        .or_else(|| (!http_status.is_success()).then_some(http_status.as_u16()));
    match code {
        Some(401 | 403) => GeminiError::Auth(message),
        Some(404) => GeminiError::ModelNotFound(message),
        Some(429) => GeminiError::RateLimited,
        Some(code) => GeminiError::Api { code, message },
        None => GeminiError::Api {
            code: 0,
            message: format!("Unknown error (no status code): {message}"),
        },
    }
}


#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::locale::Language;
    use wiremock::matchers::{header, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn answer(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": text}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        })
    }

    #[tokio::test]
    async fn normalize_success_returns_structured_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer(
                r#"{"correctedMedicineName":"Dolo 650","source":"ai_enhanced"}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let out = client
            .normalize(&NormalizeInput {
                query: "dolo 650".into(),
            })
            .await
            .unwrap();

        assert_eq!(out.corrected_medicine_name.as_deref(), Some("Dolo 650"));
    }

    #[tokio::test]
    async fn synthesize_sends_json_schema_config() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer(
                r#"{"name":"Dolo 650","composition":"Paracetamol 650mg","usage":"Fever",
                    "manufacturer":"Micro Labs","dosage":"1 tablet","sideEffects":"Nausea",
                    "source":"database_ai_enhanced"}"#,
            )))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let out = client
            .synthesize(&SynthesizeInput {
                search_term_or_name: "Dolo 650".into(),
                language: Language::En,
                context_name: Some("Dolo 650".into()),
                context_composition: Some("Paracetamol 650mg".into()),
                context_barcode: None,
            })
            .await
            .unwrap();
        assert_eq!(out.manufacturer.as_deref(), Some("Micro Labs"));

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["sideEffects"]["type"],
            "STRING"
        );
    }

    #[tokio::test]
    async fn single_attempt_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let result = client
            .normalize(&NormalizeInput { query: "x".into() })
            .await;
        assert!(matches!(result, Err(GeminiError::Api { code: 503, .. })));
    }

    #[tokio::test]
    async fn invalid_key_body_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{"reason": "API_KEY_INVALID"}]
                }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let result = client
            .normalize(&NormalizeInput { query: "x".into() })
            .await;
        assert!(matches!(result, Err(GeminiError::Auth(_))));
    }

    #[tokio::test]
    async fn unstructured_404_is_model_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let result = client
            .normalize(&NormalizeInput { query: "x".into() })
            .await;
        match &result {
            Err(GeminiError::ModelNotFound(message)) => {
                assert!(message.contains("not json"), "expected body snippet, got: {message}");
            }
            other => panic!("expected ModelNotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn status_429_returns_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let result = client
            .normalize(&NormalizeInput { query: "x".into() })
            .await;
        assert!(matches!(result, Err(GeminiError::RateLimited)));
    }

    #[tokio::test]
    async fn non_json_answer_is_malformed_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(answer("Sure! Dolo 650.")))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let result = client
            .normalize(&NormalizeInput { query: "x".into() })
            .await;
        assert!(matches!(result, Err(GeminiError::MalformedOutput(_))));
    }

    #[tokio::test]
    async fn error_field_in_200_response_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r":generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url(Client::new(), &server.uri());
        let result = client
            .normalize(&NormalizeInput { query: "x".into() })
            .await;
        assert!(matches!(result, Err(GeminiError::QuotaExhausted(_))));
    }
}
