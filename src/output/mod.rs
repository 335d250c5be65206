//! Result output: JSON envelopes and human-readable summaries.

mod json_envelope;
mod reporter;
mod summary;

pub use json_envelope::{
    ClassificationPayload, ConfigPayload, ErrorPayload, ErrorSeverity, EventType, JsonEnvelope,
    ResultType, SPEC_VERSION, SpeciesEntry, SpeciesListPayload, SpeciesLookupPayload,
};
pub use reporter::{
    JsonReporter, emit_json_error, emit_json_result, error_chain, error_payload,
};
pub use summary::{print_summary, write_summary};
