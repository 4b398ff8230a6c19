pub mod cloner;
pub mod config;
pub mod coordinator;
pub mod diff;
pub mod document;
pub mod error;
pub mod git_provider;
pub mod language;
pub mod naming;
pub mod path_filter;
pub mod query;
pub mod rag_client;
pub mod seeder;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use coordinator::{LifecycleCoordinator, Outcome};
pub use error::RagError;
