//! Namespace Domain Library
//!
//! Provisions and validates per-project namespaces inside a managed vector
//! index (Pinecone). A namespace only exists once something has been written
//! to it, so creation is forced by writing, reading back and deleting a
//! probe vector.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────┐   ┌──────────┐
//! │ NamespaceService │──▶│ Confirmation │   │ Reporter │
//! └────────┬─────────┘   └──────────────┘   └──────────┘
//!          │
//! ┌────────▼─────────┐
//! │ IndexRepository  │  (trait)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐   ┌─────────────────────────┐
//! │PineconeRepository│   │ InMemoryIndexRepository │
//! └──────────────────┘   └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use core_config::FromEnv;
//! use domain_namespace::{
//!     AutoConfirm, IndexConfig, NamespaceService, PineconeRepository, ProvisionOptions,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IndexConfig::from_env()?;
//! let repository = PineconeRepository::new(config.clone())?;
//!
//! let service = NamespaceService::new(repository, config)
//!     .with_confirmation(Arc::new(AutoConfirm));
//!
//! let report = service
//!     .create_namespace("my-project", ProvisionOptions::default())
//!     .await?;
//! println!("{} holds {:?} vectors", report.namespace, report.vector_count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod confirm;
pub mod error;
pub mod memory;
pub mod models;
pub mod pinecone;
pub mod probe;
pub mod report;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use config::IndexConfig;
pub use confirm::{is_affirmative, AutoConfirm, Confirmation, StdinConfirmation};
pub use error::{NamespaceError, NamespaceResult};
pub use memory::{CallCounts, InMemoryIndexRepository};
pub use models::{
    is_valid_project_name, IndexDescription, IndexStats, NamespaceStats, ProjectName,
    ProvisionOptions, ProvisionReport, QueryMatch, QueryRequest, Vector, PROJECT_NAME_RULES,
};
pub use pinecone::PineconeRepository;
pub use probe::{probe_vector, PROBE_VECTOR_ID};
pub use report::{RecordingReporter, ReportLevel, Reporter, TracingReporter};
pub use repository::IndexRepository;
pub use service::NamespaceService;
