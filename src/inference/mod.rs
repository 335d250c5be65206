//! Inference module: upstream gateway, reply normalization and decisions.

mod classifier;
mod decision;
mod gateway;
mod http;
mod normalize;

pub use classifier::{ClassifierOptions, SpeciesClassifier, rank};
pub use decision::{ClassificationResult, Decision, EnrichedPrediction, decide};
pub use gateway::{GatewayResponse, InferenceGateway};
pub use http::HttpGateway;
pub use normalize::{
    RawPayload, RawPrediction, UpstreamPayload, decode_embedded_json, normalize,
    normalize_payload, normalize_text,
};
