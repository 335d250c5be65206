//! Inference gateway contract.

use crate::error::Result;
use crate::inference::normalize::RawPayload;
use crate::pipeline::ImageUpload;
use std::future::Future;

/// Reply from an upstream classification provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// Reply body, parsed as JSON when possible.
    pub payload: RawPayload,
    /// Content type reported by the provider.
    pub mime_type: Option<String>,
}

/// Sends images to an upstream classifier.
///
/// Implementations report failures as [`crate::Error::RateLimited`],
/// [`crate::Error::UpstreamHttp`], [`crate::Error::Transport`] or
/// [`crate::Error::MalformedUpstreamBody`]. Timeouts are bounded by the
/// implementation; retries are left to the caller.
pub trait InferenceGateway: Send + Sync {
    /// Classify one image upstream.
    fn infer(&self, upload: &ImageUpload) -> impl Future<Output = Result<GatewayResponse>> + Send;
}
