//! RAG API: semantic query and knowledge-grounded chat.

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::types::{ChatRequest, ChatResult, QueryRequest, QueryResult, DEFAULT_TOP_K};

/// RAG API client.
pub struct RagApi {
    http: HttpClient,
}

impl RagApi {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Start a fluent query.
    ///
    /// ```no_run
    /// # async fn example(client: jabrod::Jabrod) -> jabrod::Result<()> {
    /// let result = client
    ///     .rag()
    ///     .query_builder()
    ///     .with_query("What is the refund policy?")
    ///     .with_knowledge_base("kb_123")
    ///     .with_top_k(5)
    ///     .execute()
    ///     .await?;
    /// println!("{} chunks", result.chunks.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.http.clone())
    }

    /// Start a fluent chat.
    pub fn chat_builder(&self) -> ChatBuilder {
        ChatBuilder::new(self.http.clone())
    }

    /// Semantic search without LLM processing. `top_k` defaults to 5.
    pub async fn query(&self, mut request: QueryRequest) -> Result<QueryResult> {
        request.top_k.get_or_insert(DEFAULT_TOP_K);
        self.http.post("/v1/query", &request).await
    }

    /// Retrieval-augmented chat. `top_k` defaults to 5; model and system
    /// prompt are passed through unchecked.
    pub async fn chat(&self, mut request: ChatRequest) -> Result<ChatResult> {
        request.top_k.get_or_insert(DEFAULT_TOP_K);
        self.http.post("/v1/chat", &request).await
    }
}

/// Fluent builder for [`RagApi::query`].
///
/// Required fields are checked when [`execute`](Self::execute) runs, not
/// when they are set.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    http: HttpClient,
    query: Option<String>,
    kb_id: Option<String>,
    top_k: Option<u32>,
}

impl QueryBuilder {
    fn new(http: HttpClient) -> Self {
        Self {
            http,
            query: None,
            kb_id: None,
            top_k: None,
        }
    }

    /// Set the search query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set the knowledge base ID.
    pub fn with_knowledge_base(mut self, kb_id: impl Into<String>) -> Self {
        self.kb_id = Some(kb_id.into());
        self
    }

    /// Set the number of results to return.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Validate the accumulated fields into a request.
    fn build_request(&self) -> Result<QueryRequest> {
        let query = non_empty(&self.query)
            .ok_or_else(|| Error::Validation("Query is required. Use .with_query()".to_string()))?;
        let kb_id = non_empty(&self.kb_id).ok_or_else(|| {
            Error::Validation(
                "Knowledge base ID is required. Use .with_knowledge_base()".to_string(),
            )
        })?;

        Ok(QueryRequest {
            kb_id: kb_id.to_string(),
            query: query.to_string(),
            top_k: Some(self.top_k.unwrap_or(DEFAULT_TOP_K)),
        })
    }

    /// Send the query. Can be called again to re-send the current state.
    pub async fn execute(&self) -> Result<QueryResult> {
        let request = self.build_request()?;
        self.http.post("/v1/query", &request).await
    }
}

/// Fluent builder for [`RagApi::chat`].
///
/// Unlike [`RagApi::chat`], an unset `top_k` is left out of the request and
/// the server default applies.
#[derive(Debug, Clone)]
pub struct ChatBuilder {
    http: HttpClient,
    message: Option<String>,
    kb_id: Option<String>,
    model: Option<String>,
    system_prompt: Option<String>,
    top_k: Option<u32>,
}

impl ChatBuilder {
    fn new(http: HttpClient) -> Self {
        Self {
            http,
            message: None,
            kb_id: None,
            model: None,
            system_prompt: None,
            top_k: None,
        }
    }

    /// Set the user message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the knowledge base ID.
    pub fn with_knowledge_base(mut self, kb_id: impl Into<String>) -> Self {
        self.kb_id = Some(kb_id.into());
        self
    }

    /// Set the LLM model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set the number of context chunks.
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    fn build_request(&self) -> Result<ChatRequest> {
        let message = non_empty(&self.message).ok_or_else(|| {
            Error::Validation("Message is required. Use .with_message()".to_string())
        })?;
        let kb_id = non_empty(&self.kb_id).ok_or_else(|| {
            Error::Validation(
                "Knowledge base ID is required. Use .with_knowledge_base()".to_string(),
            )
        })?;

        Ok(ChatRequest {
            kb_id: kb_id.to_string(),
            message: message.to_string(),
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            top_k: self.top_k,
        })
    }

    /// Send the chat. Can be called again to re-send the current state.
    pub async fn execute(&self) -> Result<ChatResult> {
        let request = self.build_request()?;
        self.http.post("/v1/chat", &request).await
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Jabrod;

    fn rag() -> RagApi {
        Jabrod::new("jb_test").unwrap().rag()
    }

    #[test]
    fn test_query_builder_requires_query() {
        let err = rag()
            .query_builder()
            .with_knowledge_base("kb_1")
            .build_request()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("with_query")));
    }

    #[test]
    fn test_query_builder_requires_knowledge_base() {
        let err = rag()
            .query_builder()
            .with_query("x")
            .build_request()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("with_knowledge_base")));
    }

    #[test]
    fn test_query_builder_rejects_empty_query() {
        let result = rag()
            .query_builder()
            .with_query("")
            .with_knowledge_base("kb_1")
            .build_request();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_query_builder_applies_default_top_k() {
        let request = rag()
            .query_builder()
            .with_query("x")
            .with_knowledge_base("kb_1")
            .build_request()
            .unwrap();
        assert_eq!(request.top_k, Some(DEFAULT_TOP_K));

        let request = rag()
            .query_builder()
            .with_query("x")
            .with_knowledge_base("kb_1")
            .with_top_k(12)
            .build_request()
            .unwrap();
        assert_eq!(request.top_k, Some(12));
    }

    #[test]
    fn test_chat_builder_leaves_top_k_unset() {
        let request = rag()
            .chat_builder()
            .with_message("Summarize")
            .with_knowledge_base("kb_1")
            .with_model("gpt-4o-mini")
            .build_request()
            .unwrap();
        assert_eq!(request.top_k, None);
        assert_eq!(request.model.as_deref(), Some("gpt-4o-mini"));
        assert!(request.system_prompt.is_none());
    }

    #[test]
    fn test_chat_builder_requires_message_then_kb() {
        let err = rag().chat_builder().build_request().unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("with_message")));

        let err = rag()
            .chat_builder()
            .with_message("hi")
            .build_request()
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("with_knowledge_base")));
    }
}
