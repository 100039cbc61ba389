//! HTTP client SDK for the Jabrod Cloud API.
//!
//! This crate provides a typed client for managing knowledge bases, uploading
//! documents, and running retrieval-augmented queries and chat against them.
//!
//! # Example
//!
//! ```no_run
//! use jabrod::{CreateKnowledgeBaseRequest, Jabrod, UploadText};
//!
//! # async fn example() -> jabrod::Result<()> {
//! // Create a client
//! let client = Jabrod::builder()
//!     .api_key("jb_xxx")
//!     .build()?;
//!
//! // Create a knowledge base
//! let kb = client
//!     .kb()
//!     .create(CreateKnowledgeBaseRequest::new("My KB"))
//!     .await?;
//!
//! // Upload a document
//! client
//!     .kb()
//!     .upload_text(UploadText::new(&kb.id, "Refunds are accepted within 30 days."))
//!     .await?;
//!
//! // Chat with the knowledge base
//! let answer = client
//!     .rag()
//!     .chat_builder()
//!     .with_message("What is the refund policy?")
//!     .with_knowledge_base(&kb.id)
//!     .execute()
//!     .await?;
//! println!("{}", answer.message);
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Knowledge bases**: Create, list, get, delete; list and upload documents
//! - **RAG**: Semantic query and chat, directly or through fluent builders
//! - **Usage**: Current billing period statistics and tier limits
//!
//! Every failure reported by the server surfaces as [`Error::Api`] carrying
//! the HTTP status, error code, message and any structured details.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use api::{ChatBuilder, KnowledgeBaseApi, QueryBuilder, RagApi, UsageApi};
pub use client::{ClientBuilder, Jabrod, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use http::{HttpClient, RequestOptions};
pub use types::*;

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
