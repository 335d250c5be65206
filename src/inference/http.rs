//! HTTP inference gateway for Hugging Face and OpenAI style providers.

use crate::config::{ProviderKind, UpstreamConfig};
use crate::constants::upstream::{CONNECT_TIMEOUT_SECS, MAX_ERROR_BODY_BYTES};
use crate::error::{Error, Result};
use crate::inference::gateway::{GatewayResponse, InferenceGateway};
use crate::inference::normalize::RawPayload;
use crate::pipeline::ImageUpload;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Gateway that calls the configured provider over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    provider: ProviderKind,
    endpoint: String,
    api_token: Option<String>,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    top_k: usize,
}

impl HttpGateway {
    /// Build a gateway from upstream settings.
    ///
    /// `top_k` is passed on to chat providers as the number of labels to
    /// ask for.
    pub fn from_config(config: &UpstreamConfig, top_k: usize) -> Result<Self> {
        let endpoint = config.resolved_endpoint().to_string();

        if config.provider == ProviderKind::OpenAi && config.api_token.is_none() {
            return Err(Error::ConfigValidation {
                message: "the openai provider requires an API token (--api-token or STRIKENET_API_TOKEN)"
                    .to_string(),
            });
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport {
                url: endpoint.clone(),
                source: Box::new(e),
            })?;

        info!(
            "Upstream provider: {} at {} (timeout {}s)",
            config.provider, endpoint, config.timeout_secs
        );

        Ok(Self {
            client,
            provider: config.provider,
            endpoint,
            api_token: config.api_token.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            top_k,
        })
    }

    /// Endpoint requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.api_token.as_deref() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    fn raw_image_request(&self, upload: &ImageUpload) -> RequestBuilder {
        // Hugging Face expects the raw image as the request body.
        self.client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, upload.mime_type.as_str())
            .body(upload.bytes.clone())
    }

    fn chat_request(&self, upload: &ImageUpload) -> RequestBuilder {
        self.client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&self.chat_body(upload))
    }

    fn chat_body(&self, upload: &ImageUpload) -> Value {
        let data_url = format!(
            "data:{};base64,{}",
            upload.mime_type,
            BASE64.encode(&upload.bytes)
        );
        let instruction = format!(
            "Identify the organism in this photo. Reply only with a JSON array of at most {} \
             objects of the form {{\"label\": \"<common or scientific name>\", \"score\": <confidence 0-1>}}, \
             most likely first.",
            self.top_k
        );

        json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_output_tokens,
            "messages": [
                {
                    "role": "system",
                    "content": "You are a marine and coastal wildlife identification assistant."
                },
                {
                    "role": "user",
                    "content": [
                        {"type": "text", "text": instruction},
                        {"type": "image_url", "image_url": {"url": data_url}}
                    ]
                }
            ]
        })
    }

    async fn read_response(&self, response: reqwest::Response) -> Result<GatewayResponse> {
        let status = response.status();
        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Upstream rate limit hit at {}", self.endpoint);
            return Err(Error::RateLimited);
        }

        let bytes = response.bytes().await.map_err(|e| Error::Transport {
            url: self.endpoint.clone(),
            source: Box::new(e),
        })?;

        if status.is_client_error() || status.is_server_error() {
            return Err(Error::UpstreamHttp {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&bytes)),
            });
        }

        let text = String::from_utf8(bytes.to_vec()).map_err(|e| Error::MalformedUpstreamBody {
            reason: format!("response body is not valid UTF-8: {e}"),
        })?;

        let payload = decode_body(text, mime_type.as_deref())?;
        Ok(GatewayResponse { payload, mime_type })
    }
}

impl InferenceGateway for HttpGateway {
    async fn infer(&self, upload: &ImageUpload) -> Result<GatewayResponse> {
        let request = match self.provider {
            ProviderKind::HuggingFace => self.raw_image_request(upload),
            ProviderKind::OpenAi => self.chat_request(upload),
        };

        debug!(
            "Sending {} ({} bytes, {}) to {}",
            upload.path.display(),
            upload.bytes.len(),
            upload.mime_type,
            self.endpoint
        );

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| Error::Transport {
                url: self.endpoint.clone(),
                source: Box::new(e),
            })?;

        self.read_response(response).await
    }
}

/// Parse a reply body; JSON-typed bodies must parse.
fn decode_body(text: String, mime_type: Option<&str>) -> Result<RawPayload> {
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => Ok(RawPayload::Json(value)),
        Err(e) if mime_type.is_some_and(is_json_mime) => Err(Error::MalformedUpstreamBody {
            reason: format!("failed to decode JSON response: {e}"),
        }),
        Err(_) => Ok(RawPayload::Text(text)),
    }
}

fn is_json_mime(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
