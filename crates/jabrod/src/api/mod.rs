//! API endpoint implementations.

mod knowledge_bases;
mod rag;
mod usage;

pub use knowledge_bases::KnowledgeBaseApi;
pub use rag::{ChatBuilder, QueryBuilder, RagApi};
pub use usage::UsageApi;
