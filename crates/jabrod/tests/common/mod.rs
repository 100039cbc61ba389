//! Common test utilities for integration tests.

#![allow(dead_code)]

use jabrod::Jabrod;
use serde_json::{json, Value};
use wiremock::{MockServer, ResponseTemplate};

/// API key used by every test client.
pub const TEST_API_KEY: &str = "jb_test_key";

/// Expected `Authorization` header value for [`TEST_API_KEY`].
pub const TEST_BEARER: &str = "Bearer jb_test_key";

/// Start a mock server and a client pointed at it.
pub async fn setup() -> (MockServer, Jabrod) {
    let server = MockServer::start().await;
    let client = Jabrod::builder()
        .api_key(TEST_API_KEY)
        .base_url(server.uri())
        .build()
        .expect("client should build");
    (server, client)
}

/// A `200` response wrapping `data` in a success envelope.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

/// A failure envelope with the given status and error object.
pub fn failure(status: u16, error: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "success": false, "error": error }))
}

pub fn knowledge_base_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "Product documentation",
        "status": "active",
        "documentCount": 2,
        "vectorCount": 48,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-02T10:00:00Z"
    })
}

pub fn document_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "txt",
        "mimeType": "text/plain",
        "size": 5,
        "status": "pending",
        "createdAt": "2024-05-01T10:00:00Z"
    })
}

/// Body of the single request the server received.
pub async fn only_request_body(server: &MockServer) -> String {
    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1, "expected exactly one request");
    String::from_utf8_lossy(&requests[0].body).into_owned()
}
