//! Knowledge base API.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::de::IgnoredAny;

use crate::error::Result;
use crate::http::HttpClient;
use crate::types::{
    CreateKnowledgeBaseRequest, Document, KnowledgeBase, UploadFile, UploadText,
    DEFAULT_TEXT_FILENAME, DEFAULT_UPLOAD_FILENAME,
};

/// Multipart field the server reads uploads from.
const UPLOAD_FIELD: &str = "file";

/// Knowledge base API client.
///
/// IDs are interpolated into paths as given; callers must escape any
/// reserved characters themselves.
pub struct KnowledgeBaseApi {
    http: HttpClient,
}

impl KnowledgeBaseApi {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List all knowledge bases.
    pub async fn list(&self) -> Result<Vec<KnowledgeBase>> {
        self.http.get("/v1/kb").await
    }

    /// Create a new knowledge base.
    pub async fn create(&self, request: CreateKnowledgeBaseRequest) -> Result<KnowledgeBase> {
        self.http.post("/v1/kb", &request).await
    }

    /// Get a knowledge base by ID.
    pub async fn get(&self, kb_id: &str) -> Result<KnowledgeBase> {
        self.http.get(&format!("/v1/kb/{}", kb_id)).await
    }

    /// Delete a knowledge base. Any payload in the response is ignored.
    pub async fn delete(&self, kb_id: &str) -> Result<()> {
        let _: IgnoredAny = self.http.delete(&format!("/v1/kb/{}", kb_id)).await?;
        Ok(())
    }

    /// List documents in a knowledge base.
    pub async fn list_documents(&self, kb_id: &str) -> Result<Vec<Document>> {
        self.http.get(&documents_path(kb_id)).await
    }

    /// Upload raw bytes as a document.
    ///
    /// The part is named `"upload"` unless a filename is set.
    pub async fn upload(&self, file: UploadFile) -> Result<Document> {
        let filename = file
            .filename
            .unwrap_or_else(|| DEFAULT_UPLOAD_FILENAME.to_string());
        let part = file_part(file.bytes, filename, file.mime_type.as_deref())?;
        // Send the filename as given rather than percent-encoded.
        let form = Form::new().percent_encode_noop().part(UPLOAD_FIELD, part);

        tracing::debug!(kb_id = %file.kb_id, "Uploading document");
        self.http.post_form(&documents_path(&file.kb_id), form).await
    }

    /// Upload inline text as a `text/plain` document.
    ///
    /// The document is named `"text.txt"` unless a name is set.
    pub async fn upload_text(&self, text: UploadText) -> Result<Document> {
        let filename = text
            .name
            .unwrap_or_else(|| DEFAULT_TEXT_FILENAME.to_string());
        self.upload(UploadFile {
            kb_id: text.kb_id,
            bytes: text.content.into_bytes(),
            filename: Some(filename),
            mime_type: Some("text/plain".to_string()),
        })
        .await
    }

    /// Read a file from disk and upload it under its own file name.
    pub async fn upload_path(&self, kb_id: &str, path: impl AsRef<Path>) -> Result<Document> {
        let file = UploadFile::from_path(kb_id, path).await?;
        self.upload(file).await
    }
}

fn documents_path(kb_id: &str) -> String {
    format!("/v1/kb/{}/documents", kb_id)
}

fn file_part(bytes: Vec<u8>, filename: String, mime_type: Option<&str>) -> Result<Part> {
    let part = Part::bytes(bytes).file_name(filename);
    match mime_type {
        Some(mime) => Ok(part.mime_str(mime)?),
        None => Ok(part),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_path() {
        assert_eq!(documents_path("kb_123"), "/v1/kb/kb_123/documents");
    }

    #[test]
    fn test_file_part_rejects_invalid_mime() {
        let result = file_part(b"x".to_vec(), "a.bin".to_string(), Some("not a mime"));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_part_accepts_text_plain() {
        let result = file_part(b"x".to_vec(), "a.txt".to_string(), Some("text/plain"));
        assert!(result.is_ok());
    }
}
