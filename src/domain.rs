// Domain layer modules
pub mod summary_request;

// Re-exports
pub use summary_request::{ExtractedParams, Identifier, MissingFieldsError, RequestParams, RequiredField};
