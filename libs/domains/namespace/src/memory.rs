//! In-process index used by integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{NamespaceError, NamespaceResult};
use crate::models::{
    IndexDescription, IndexStats, NamespaceStats, QueryMatch, QueryRequest, Vector,
};
use crate::repository::IndexRepository;

#[derive(Debug, Default)]
struct IndexData {
    dimension: u32,
    namespaces: HashMap<String, BTreeMap<String, Vector>>,
}

/// Number of calls made per repository operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub describe_index: usize,
    pub describe_stats: usize,
    pub upsert: usize,
    pub query: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.describe_index + self.describe_stats + self.upsert + self.query + self.delete
    }
}

/// IndexRepository kept in memory
///
/// Namespaces materialise on first upsert and disappear when their last
/// vector is deleted, matching the managed service. Queries rank by cosine
/// similarity.
#[derive(Debug, Default)]
pub struct InMemoryIndexRepository {
    indexes: Mutex<HashMap<String, IndexData>>,
    calls: Mutex<CallCounts>,
    /// When set, queries return nothing (simulates an index that has not
    /// caught up with recent writes)
    stale_reads: bool,
}

impl InMemoryIndexRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(self, name: &str, dimension: u32) -> Self {
        self.lock_indexes().insert(
            name.to_string(),
            IndexData {
                dimension,
                namespaces: HashMap::new(),
            },
        );
        self
    }

    /// Seed a namespace. The index must have been registered first.
    pub fn with_vectors(self, index: &str, namespace: &str, vectors: Vec<Vector>) -> Self {
        if let Some(data) = self.lock_indexes().get_mut(index) {
            let ns = data.namespaces.entry(namespace.to_string()).or_default();
            for vector in vectors {
                ns.insert(vector.id.clone(), vector);
            }
        }
        self
    }

    pub fn with_stale_reads(mut self) -> Self {
        self.stale_reads = true;
        self
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ids currently stored in a namespace, sorted
    pub fn ids(&self, index: &str, namespace: &str) -> Vec<String> {
        self.lock_indexes()
            .get(index)
            .and_then(|data| data.namespaces.get(namespace))
            .map(|ns| ns.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn lock_indexes(&self) -> std::sync::MutexGuard<'_, HashMap<String, IndexData>> {
        self.indexes.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, bump: impl FnOnce(&mut CallCounts)) {
        bump(&mut self.calls.lock().unwrap_or_else(|e| e.into_inner()));
    }

    fn with_index_data<T>(
        &self,
        index: &str,
        f: impl FnOnce(&mut IndexData) -> NamespaceResult<T>,
    ) -> NamespaceResult<T> {
        let mut indexes = self.lock_indexes();
        let data = indexes
            .get_mut(index)
            .ok_or_else(|| NamespaceError::IndexNotFound(index.to_string()))?;
        f(data)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl IndexRepository for InMemoryIndexRepository {
    async fn describe_index(&self, index: &str) -> NamespaceResult<IndexDescription> {
        self.record(|c| c.describe_index += 1);
        self.with_index_data(index, |data| {
            Ok(IndexDescription {
                name: index.to_string(),
                host: format!("memory://{}", index),
                dimension: Some(data.dimension),
                metric: Some("cosine".to_string()),
                ready: true,
            })
        })
    }

    async fn describe_stats(&self, index: &str) -> NamespaceResult<IndexStats> {
        self.record(|c| c.describe_stats += 1);
        self.with_index_data(index, |data| {
            let namespaces: HashMap<String, NamespaceStats> = data
                .namespaces
                .iter()
                .map(|(name, ns)| {
                    (
                        name.clone(),
                        NamespaceStats {
                            vector_count: ns.len() as u64,
                        },
                    )
                })
                .collect();
            let total_vector_count = namespaces.values().map(|s| s.vector_count).sum();

            Ok(IndexStats {
                namespaces,
                dimension: Some(data.dimension),
                total_vector_count,
                index_fullness: 0.0,
            })
        })
    }

    async fn upsert(
        &self,
        index: &str,
        namespace: &str,
        vectors: Vec<Vector>,
    ) -> NamespaceResult<u32> {
        self.record(|c| c.upsert += 1);
        self.with_index_data(index, |data| {
            if let Some(bad) = vectors
                .iter()
                .find(|v| v.values.len() != data.dimension as usize)
            {
                return Err(NamespaceError::Pinecone {
                    status: 400,
                    message: format!(
                        "Vector dimension {} does not match the dimension of the index {}",
                        bad.values.len(),
                        data.dimension
                    ),
                });
            }

            let ns = data.namespaces.entry(namespace.to_string()).or_default();
            let count = vectors.len() as u32;
            for vector in vectors {
                ns.insert(vector.id.clone(), vector);
            }
            Ok(count)
        })
    }

    async fn query(
        &self,
        index: &str,
        namespace: &str,
        request: QueryRequest,
    ) -> NamespaceResult<Vec<QueryMatch>> {
        self.record(|c| c.query += 1);
        let stale = self.stale_reads;
        self.with_index_data(index, |data| {
            let Some(ns) = data.namespaces.get(namespace).filter(|_| !stale) else {
                return Ok(Vec::new());
            };

            let mut matches: Vec<QueryMatch> = ns
                .values()
                .map(|v| QueryMatch {
                    id: v.id.clone(),
                    score: cosine_similarity(&request.vector, &v.values),
                    metadata: if request.include_metadata {
                        v.metadata.clone()
                    } else {
                        None
                    },
                })
                .collect();
            matches.sort_by(|a, b| b.score.total_cmp(&a.score));
            matches.truncate(request.top_k as usize);
            Ok(matches)
        })
    }

    async fn delete(
        &self,
        index: &str,
        namespace: &str,
        ids: Vec<String>,
    ) -> NamespaceResult<()> {
        self.record(|c| c.delete += 1);
        self.with_index_data(index, |data| {
            if let Some(ns) = data.namespaces.get_mut(namespace) {
                for id in &ids {
                    ns.remove(id);
                }
                if ns.is_empty() {
                    data.namespaces.remove(namespace);
                }
            }
            Ok(())
        })
    }
}
