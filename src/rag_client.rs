//! Collaborator interface for the RAG backend. The operation names and
//! signatures are fixed bit-for-bit (spec §6) because multiple backend
//! implementations must interoperate. `HttpRagClient` is a thin `reqwest`
//! binding of that interface, analogous to the source's `KAITORagClient`;
//! every test in this crate drives the trait through an in-memory mock
//! instead (see `crate::mock`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::document::Document;
use crate::error::RagError;

#[derive(Debug, Default, Deserialize)]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub response: String,
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
}

#[async_trait]
pub trait RagBackend: Send + Sync {
    async fn list_indexes(&self) -> Result<Vec<String>, RagError>;
    async fn index_documents(&self, index: &str, docs: &[Document]) -> Result<(), RagError>;
    async fn list_documents(
        &self,
        index: &str,
        metadata_filter: &[(&str, &str)],
    ) -> Result<ListDocumentsResponse, RagError>;
    async fn update_documents(&self, index: &str, docs: &[Document]) -> Result<(), RagError>;
    async fn delete_documents(&self, index: &str, doc_ids: &[String]) -> Result<(), RagError>;
    async fn delete_index(&self, index: &str) -> Result<(), RagError>;
    async fn persist_index(&self, index: &str, path: &str) -> Result<(), RagError>;
    async fn load_index(&self, index: &str, path: &str, overwrite: bool) -> Result<(), RagError>;
    async fn query(
        &self,
        index: &str,
        query: &str,
        temperature: f32,
        max_tokens: u32,
        top_k: u32,
    ) -> Result<QueryResponse, RagError>;
}

/// Minimal `reqwest`-backed implementation of [`RagBackend`] over a JSON
/// HTTP API. Authentication and retry policy are a deployment concern and
/// out of scope for the core (spec §1).
pub struct HttpRagClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRagClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send_ok(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, RagError> {
        let response = request
            .send()
            .await
            .map_err(|err| RagError::BackendFatal(err.to_string()))?;
        response
            .error_for_status()
            .map_err(|err| RagError::BackendFatal(err.to_string()))
    }
}

#[async_trait]
impl RagBackend for HttpRagClient {
    async fn list_indexes(&self) -> Result<Vec<String>, RagError> {
        let response = self.send_ok(self.http.get(self.url("/indexes"))).await?;
        response
            .json()
            .await
            .map_err(|err| RagError::BackendFatal(err.to_string()))
    }

    async fn index_documents(&self, index: &str, docs: &[Document]) -> Result<(), RagError> {
        self.send_ok(
            self.http
                .post(self.url(&format!("/indexes/{index}/documents")))
                .json(docs),
        )
        .await?;
        Ok(())
    }

    async fn list_documents(
        &self,
        index: &str,
        metadata_filter: &[(&str, &str)],
    ) -> Result<ListDocumentsResponse, RagError> {
        let filter: serde_json::Map<String, serde_json::Value> = metadata_filter
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        let response = self
            .send_ok(
                self.http
                    .get(self.url(&format!("/indexes/{index}/documents")))
                    .json(&json!({ "metadata_filter": filter })),
            )
            .await?;
        response
            .json()
            .await
            .map_err(|err| RagError::BackendFatal(err.to_string()))
    }

    async fn update_documents(&self, index: &str, docs: &[Document]) -> Result<(), RagError> {
        self.send_ok(
            self.http
                .put(self.url(&format!("/indexes/{index}/documents")))
                .json(docs),
        )
        .await?;
        Ok(())
    }

    async fn delete_documents(&self, index: &str, doc_ids: &[String]) -> Result<(), RagError> {
        self.send_ok(
            self.http
                .delete(self.url(&format!("/indexes/{index}/documents")))
                .json(&json!({ "doc_ids": doc_ids })),
        )
        .await?;
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), RagError> {
        self.send_ok(self.http.delete(self.url(&format!("/indexes/{index}"))))
            .await?;
        Ok(())
    }

    async fn persist_index(&self, index: &str, path: &str) -> Result<(), RagError> {
        self.send_ok(
            self.http
                .post(self.url(&format!("/indexes/{index}/persist")))
                .json(&json!({ "path": path })),
        )
        .await?;
        Ok(())
    }

    async fn load_index(&self, index: &str, path: &str, overwrite: bool) -> Result<(), RagError> {
        self.send_ok(
            self.http
                .post(self.url(&format!("/indexes/{index}/load")))
                .json(&json!({ "path": path, "overwrite": overwrite })),
        )
        .await?;
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        query: &str,
        temperature: f32,
        max_tokens: u32,
        top_k: u32,
    ) -> Result<QueryResponse, RagError> {
        let response = self
            .send_ok(self.http.post(self.url(&format!("/indexes/{index}/query"))).json(
                &QueryRequest {
                    query,
                    temperature,
                    max_tokens,
                    top_k,
                },
            ))
            .await?;
        response
            .json()
            .await
            .map_err(|err| RagError::BackendFatal(err.to_string()))
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_k: u32,
}
