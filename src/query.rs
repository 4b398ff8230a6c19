//! Thin façade over the Lifecycle Coordinator exposing only `query`, so a
//! read-only deployment can depend on this module alone and hold no write
//! credentials for the RAG backend (spec §4.7).

use crate::coordinator::LifecycleCoordinator;
use crate::error::RagError;
use crate::rag_client::QueryResponse;

pub struct QueryDispatcher<'a> {
    coordinator: &'a LifecycleCoordinator,
}

impl<'a> QueryDispatcher<'a> {
    pub fn new(coordinator: &'a LifecycleCoordinator) -> Self {
        Self { coordinator }
    }

    pub async fn query(
        &self,
        pr_url: &str,
        query: &str,
        temperature: f32,
        max_tokens: u32,
        top_k: u32,
    ) -> Result<QueryResponse, RagError> {
        self.coordinator.query(pr_url, query, temperature, max_tokens, top_k).await
    }
}
