//! REST wrapper for the Freepik generation endpoints.
//!
//! Returns raw response bodies; envelope parsing lives in
//! [`crate::messages`].

use serde::Serialize;

use crate::config::FreepikConfig;

/// Text-to-image (Mystic) task collection.
pub const MYSTIC_PATH: &str = "/v1/ai/mystic";

/// Image-to-video (Kling v2) task collection.
pub const KLING_V2_PATH: &str = "/v1/ai/image-to-video/kling-v2";

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-freepik-api-key";

/// Errors from the Freepik REST layer.
#[derive(Debug, thiserror::Error)]
pub enum FreepikApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Freepik returned a non-2xx status code.
    #[error("Freepik API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Request timed out")]
    Timeout,
}

/// Body for `POST /v1/ai/mystic`.
#[derive(Debug, Clone, Serialize)]
pub struct MysticRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling: Option<MysticStyling>,
    pub aspect_ratio: &'static str,
    pub model: &'static str,
    pub num_images: u32,
    pub resolution: &'static str,
    pub engine: &'static str,
    pub creative_detailing: u32,
    pub filter_nsfw: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MysticStyling {
    pub style: String,
}

/// Body for `POST /v1/ai/image-to-video/kling-v2`.
#[derive(Debug, Clone, Serialize)]
pub struct KlingRequest {
    pub image: String,
    /// Either `"5"` or `"10"`.
    pub duration: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// HTTP client for the Freepik API.
pub struct FreepikApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FreepikApi {
    /// Build a client whose every request is bounded by the configured
    /// timeout.
    pub fn new(config: &FreepikConfig) -> Result<Self, FreepikApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(
            client,
            config.base_url.clone(),
            config.api_key.clone(),
        ))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Start a Mystic text-to-image task.
    pub async fn create_mystic_task(
        &self,
        request: &MysticRequest,
    ) -> Result<String, FreepikApiError> {
        self.post_json(MYSTIC_PATH, request).await
    }

    pub async fn get_mystic_task(&self, task_id: &str) -> Result<String, FreepikApiError> {
        self.get(&format!("{MYSTIC_PATH}/{task_id}")).await
    }

    /// Start a Kling v2 image-to-video task.
    pub async fn create_kling_task(
        &self,
        request: &KlingRequest,
    ) -> Result<String, FreepikApiError> {
        self.post_json(KLING_V2_PATH, request).await
    }

    pub async fn get_kling_task(&self, task_id: &str) -> Result<String, FreepikApiError> {
        self.get(&format!("{KLING_V2_PATH}/{task_id}")).await
    }

    // ---- private helpers ----

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<String, FreepikApiError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(classify_request_error)?;

        Self::read_body(response).await
    }

    async fn get(&self, path: &str) -> Result<String, FreepikApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(classify_request_error)?;

        Self::read_body(response).await
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`FreepikApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FreepikApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(FreepikApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, FreepikApiError> {
        let response = Self::ensure_success(response).await?;
        response.text().await.map_err(classify_request_error)
    }
}

fn classify_request_error(err: reqwest::Error) -> FreepikApiError {
    if err.is_timeout() {
        FreepikApiError::Timeout
    } else {
        FreepikApiError::Request(err)
    }
}
