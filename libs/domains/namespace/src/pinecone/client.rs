use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::IndexConfig;
use crate::error::{NamespaceError, NamespaceResult};
use crate::models::{IndexDescription, IndexStats, QueryMatch, QueryRequest, Vector};
use crate::repository::IndexRepository;

const API_KEY_HEADER: &str = "Api-Key";
const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

/// Pinecone-backed implementation of IndexRepository (REST API)
///
/// Index hosts are resolved through the control plane on first use and
/// cached for the lifetime of the repository.
pub struct PineconeRepository {
    client: Client,
    config: IndexConfig,
    hosts: RwLock<HashMap<String, String>>,
}

impl PineconeRepository {
    /// Build the HTTP client. No network traffic happens here.
    pub fn new(config: IndexConfig) -> NamespaceResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| NamespaceError::Http(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            config,
            hosts: RwLock::new(HashMap::new()),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> NamespaceResult<RequestBuilder> {
        let api_key = self.config.require_api_key()?;
        Ok(builder
            .header(API_KEY_HEADER, api_key)
            .header(API_VERSION_HEADER, &self.config.api_version)
            .header("Accept", "application/json"))
    }

    fn control_plane_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.control_plane_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Data-plane URL for `path` on the host serving `index`
    async fn data_plane_url(&self, index: &str, path: &str) -> NamespaceResult<String> {
        let cached = self.hosts.read().await.get(index).cloned();
        let host = match cached {
            Some(host) => host,
            None => self.describe_index(index).await?.host,
        };

        Ok(format!(
            "{}/{}",
            host_base_url(&host),
            path.trim_start_matches('/')
        ))
    }

    async fn post_data_plane<B, T>(&self, index: &str, path: &str, body: &B) -> NamespaceResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.data_plane_url(index, path).await?;
        debug!(%url, "POST");

        let request = self.authorized(self.client.post(&url))?.json(body);
        let response = request.send().await?;
        decode(response).await
    }
}

/// `https://` is assumed for bare hosts as returned by the control plane
fn host_base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> NamespaceResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NamespaceError::Pinecone {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        // delete answers with an empty body on some API versions
        return Ok(serde_json::from_slice(b"{}")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Pull the human-readable message out of a Pinecone error body.
///
/// Control plane: `{"error": {"code": "...", "message": "..."}, "status": 404}`
/// Data plane: `{"code": 3, "message": "...", "details": []}`
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Option<Inner>,
        message: Option<String>,
    }

    #[derive(Deserialize)]
    struct Inner {
        message: Option<String>,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(Envelope {
            error: Some(Inner { message: Some(m) }),
            ..
        }) => m,
        Ok(Envelope {
            message: Some(m), ..
        }) => m,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    host: String,
    #[serde(default)]
    dimension: Option<u32>,
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertBody<'a> {
    vectors: &'a [Vector],
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    namespace: &'a str,
    vector: &'a [f32],
    top_k: u32,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    ids: &'a [String],
    namespace: &'a str,
}

#[async_trait]
impl IndexRepository for PineconeRepository {
    #[instrument(skip(self))]
    async fn describe_index(&self, index: &str) -> NamespaceResult<IndexDescription> {
        let url = self.control_plane_url(&format!("indexes/{}", urlencoding::encode(index)));
        debug!(%url, "GET");

        let response = self.authorized(self.client.get(&url))?.send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(NamespaceError::IndexNotFound(index.to_string()));
        }

        let model: IndexModel = decode(response).await?;
        self.hosts
            .write()
            .await
            .insert(index.to_string(), model.host.clone());

        Ok(IndexDescription {
            name: model.name,
            host: model.host,
            dimension: model.dimension,
            metric: model.metric,
            ready: model.status.map(|s| s.ready).unwrap_or(false),
        })
    }

    #[instrument(skip(self))]
    async fn describe_stats(&self, index: &str) -> NamespaceResult<IndexStats> {
        self.post_data_plane(index, "describe_index_stats", &serde_json::json!({}))
            .await
    }

    #[instrument(skip(self, vectors), fields(count = vectors.len()))]
    async fn upsert(
        &self,
        index: &str,
        namespace: &str,
        vectors: Vec<Vector>,
    ) -> NamespaceResult<u32> {
        let body = UpsertBody {
            vectors: &vectors,
            namespace,
        };
        let response: UpsertResponse = self.post_data_plane(index, "vectors/upsert", &body).await?;
        Ok(response.upserted_count)
    }

    #[instrument(skip(self, request), fields(top_k = request.top_k))]
    async fn query(
        &self,
        index: &str,
        namespace: &str,
        request: QueryRequest,
    ) -> NamespaceResult<Vec<QueryMatch>> {
        let body = QueryBody {
            namespace,
            vector: &request.vector,
            top_k: request.top_k,
            include_metadata: request.include_metadata,
            include_values: request.include_values,
        };
        let response: QueryResponse = self.post_data_plane(index, "query", &body).await?;
        Ok(response.matches)
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        index: &str,
        namespace: &str,
        ids: Vec<String>,
    ) -> NamespaceResult<()> {
        let body = DeleteBody {
            ids: &ids,
            namespace,
        };
        let _: serde_json::Value = self.post_data_plane(index, "vectors/delete", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_base_url() {
        assert_eq!(
            host_base_url("ora-abc123.svc.aped-4627-b74a.pinecone.io"),
            "https://ora-abc123.svc.aped-4627-b74a.pinecone.io"
        );
        assert_eq!(host_base_url("http://127.0.0.1:5081/"), "http://127.0.0.1:5081");
        assert_eq!(host_base_url("https://example.io"), "https://example.io");
    }

    #[test]
    fn test_error_message_control_plane_shape() {
        let body = r#"{"error":{"code":"NOT_FOUND","message":"Resource idx not found"},"status":404}"#;
        assert_eq!(error_message(body), "Resource idx not found");
    }

    #[test]
    fn test_error_message_data_plane_shape() {
        let body = r#"{"code":3,"message":"Vector dimension 3 does not match the dimension of the index 1536","details":[]}"#;
        assert_eq!(
            error_message(body),
            "Vector dimension 3 does not match the dimension of the index 1536"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("upstream connect error"), "upstream connect error");
        assert_eq!(error_message("  "), "empty response body");
    }

    #[test]
    fn test_control_plane_url_joins_cleanly() {
        let repo = PineconeRepository::new(
            IndexConfig::default().with_control_plane_url("https://api.pinecone.io/"),
        )
        .unwrap();
        assert_eq!(
            repo.control_plane_url("/indexes/ora"),
            "https://api.pinecone.io/indexes/ora"
        );
    }

    #[tokio::test]
    async fn test_requests_fail_without_api_key() {
        let repo = PineconeRepository::new(IndexConfig::default()).unwrap();
        let err = repo.describe_index("ora-framework-index").await.unwrap_err();
        assert!(matches!(err, NamespaceError::Config(_)));
    }

    #[test]
    fn test_query_body_uses_camel_case() {
        let vector = [0.1_f32, 0.2];
        let body = QueryBody {
            namespace: "my-project",
            vector: &vector,
            top_k: 1,
            include_metadata: true,
            include_values: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["topK"], 1);
        assert_eq!(json["includeMetadata"], true);
        assert_eq!(json["namespace"], "my-project");
    }
}
