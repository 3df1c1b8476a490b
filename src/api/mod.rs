// Completion API module

mod client;
mod request;
mod streaming;
pub mod types;

pub use client::ApiClient;
pub use request::{apply_max_tokens_override, build_request, length_params, LengthParams};
pub use types::{ApiError, CompletionRequest, Message, TokenUsage};
