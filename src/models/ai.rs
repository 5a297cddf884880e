//! AI command request and response bodies.

use serde::{Deserialize, Serialize};

/// Request body for the AI command.
#[derive(Debug, Clone, Deserialize)]
pub struct AiQueryRequest {
    pub text: String,
}

/// Answer to the AI command, already split into displayable chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiQueryResponse {
    /// Model that answered, absent when every model failed.
    pub model: Option<String>,
    pub chunks: Vec<String>,
}
