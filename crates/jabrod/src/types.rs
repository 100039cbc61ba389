//! Request and response types for the Jabrod API.
//!
//! These types mirror the server's API contract. Field names are camelCase
//! on the wire.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of ranked results for queries and chat context.
pub const DEFAULT_TOP_K: u32 = 5;

/// Filename used for byte uploads that carry no name.
pub const DEFAULT_UPLOAD_FILENAME: &str = "upload";

/// Filename used for text uploads that carry no name.
pub const DEFAULT_TEXT_FILENAME: &str = "text.txt";

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform wrapper around every API response.
///
/// Parsed leniently: the error object is kept as raw JSON so that partial or
/// oddly shaped errors still map onto [`Error::Api`] with default fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the server considers the call successful.
    #[serde(default)]
    pub success: bool,
    /// Payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Error object on failure (`{code, message, details?}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
}

impl ApiEnvelope {
    /// Convert into an API error carrying the transport status.
    pub(crate) fn into_error(self, status: u16) -> Error {
        let field = |name: &str| {
            self.error
                .as_ref()
                .and_then(|e| e.get(name))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        };
        let details = self
            .error
            .as_ref()
            .and_then(|e| e.get("details"))
            .filter(|d| !d.is_null())
            .cloned();
        Error::api(status, field("code"), field("message"), details)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Knowledge bases
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle status of a knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeBaseStatus {
    Active,
    Processing,
    Error,
    Archived,
}

/// Knowledge base details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    /// Knowledge base ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: KnowledgeBaseStatus,
    /// Number of documents.
    pub document_count: u64,
    /// Number of indexed vectors.
    pub vector_count: u64,
    /// Creation time (ISO 8601).
    pub created_at: String,
    /// Last update time (ISO 8601).
    pub updated_at: String,
}

/// Request to create a knowledge base.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateKnowledgeBaseRequest {
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateKnowledgeBaseRequest {
    /// Create a request with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Documents
// ─────────────────────────────────────────────────────────────────────────────

/// Processing status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// A document stored in a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document ID.
    pub id: String,
    /// File name.
    pub name: String,
    /// Content classification (pdf, txt, ...).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// MIME type, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Processing status.
    pub status: DocumentStatus,
    /// Number of chunks produced by indexing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<u64>,
    /// Failure reason when status is `failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Upload time.
    pub created_at: String,
    /// Time processing finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
}

/// Raw bytes to upload into a knowledge base.
#[derive(Debug, Clone, Default)]
pub struct UploadFile {
    /// Target knowledge base ID.
    pub kb_id: String,
    /// File content.
    pub bytes: Vec<u8>,
    /// Filename sent with the multipart part. Defaults to `"upload"`.
    pub filename: Option<String>,
    /// MIME type of the part, if known.
    pub mime_type: Option<String>,
}

impl UploadFile {
    /// Wrap bytes for upload.
    pub fn new(kb_id: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kb_id: kb_id.into(),
            bytes: bytes.into(),
            filename: None,
            mime_type: None,
        }
    }

    /// Read a file from disk, keeping its file name.
    pub async fn from_path(kb_id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self {
            kb_id: kb_id.into(),
            bytes,
            filename,
            mime_type: None,
        })
    }

    /// Set the filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Inline text to upload as a `text/plain` document.
#[derive(Debug, Clone, Default)]
pub struct UploadText {
    /// Target knowledge base ID.
    pub kb_id: String,
    /// Text content.
    pub content: String,
    /// Document name. Defaults to `"text.txt"`.
    pub name: Option<String>,
}

impl UploadText {
    /// Wrap text for upload.
    pub fn new(kb_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kb_id: kb_id.into(),
            content: content.into(),
            name: None,
        }
    }

    /// Set the document name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query
// ─────────────────────────────────────────────────────────────────────────────

/// Semantic search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Knowledge base ID.
    pub kb_id: String,
    /// Search query.
    pub query: String,
    /// Number of results (1-20).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl QueryRequest {
    pub fn new(kb_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            kb_id: kb_id.into(),
            query: query.into(),
            top_k: None,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// Semantic search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Ranked chunks.
    pub chunks: Vec<QueryChunk>,
    /// Query that was run.
    pub query: String,
    /// Server-side latency.
    pub latency_ms: u64,
}

/// A ranked content chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryChunk {
    pub content: String,
    pub score: f64,
    pub document_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat
// ─────────────────────────────────────────────────────────────────────────────

/// RAG chat request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Knowledge base ID.
    pub kb_id: String,
    /// User message.
    pub message: String,
    /// LLM model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Custom system prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Number of context chunks (1-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl ChatRequest {
    /// Create a chat request with just a knowledge base and message.
    pub fn new(kb_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kb_id: kb_id.into(),
            message: message.into(),
            model: None,
            system_prompt: None,
            top_k: None,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the number of context chunks.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }
}

/// RAG chat result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResult {
    /// Generated answer.
    pub message: String,
    /// Chunks the answer was grounded on.
    pub sources: Vec<ChatSource>,
    /// Model used.
    pub model: String,
    /// Server-side latency.
    pub latency_ms: u64,
    /// Token accounting, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// A source chunk cited by a chat answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSource {
    pub document_id: String,
    pub content: String,
    pub score: f64,
}

/// Token usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────────────────────────────────────

/// Usage statistics for the current billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub period: UsagePeriod,
    pub queries: u64,
    pub chats: u64,
    pub documents_processed: u64,
    pub tokens_used: u64,
    pub storage_used_bytes: u64,
    /// Subscription tier.
    pub tier: String,
    pub limits: UsageLimits,
}

/// Billing period bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePeriod {
    pub start: String,
    pub end: String,
}

/// Tier limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLimits {
    pub queries_per_month: u64,
    pub chats_per_month: u64,
    pub storage_bytes: u64,
}
