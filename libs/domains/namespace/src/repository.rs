use async_trait::async_trait;

use crate::error::NamespaceResult;
use crate::models::{IndexDescription, IndexStats, QueryMatch, QueryRequest, Vector};

/// Repository trait for the remote vector index
///
/// Abstracts the managed index service. Namespaces are implicit: they
/// come into existence on the first upsert and there is no create call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IndexRepository: Send + Sync {
    /// Look up an index, failing with `IndexNotFound` if it does not exist
    async fn describe_index(&self, index: &str) -> NamespaceResult<IndexDescription>;

    /// Index-wide statistics, including per-namespace vector counts
    async fn describe_stats(&self, index: &str) -> NamespaceResult<IndexStats>;

    /// Insert or overwrite vectors by id, returns the upserted count
    async fn upsert(
        &self,
        index: &str,
        namespace: &str,
        vectors: Vec<Vector>,
    ) -> NamespaceResult<u32>;

    /// Similarity search within a namespace
    async fn query(
        &self,
        index: &str,
        namespace: &str,
        request: QueryRequest,
    ) -> NamespaceResult<Vec<QueryMatch>>;

    /// Delete vectors by id
    async fn delete(&self, index: &str, namespace: &str, ids: Vec<String>)
    -> NamespaceResult<()>;
}
