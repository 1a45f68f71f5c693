use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{NamespaceError, NamespaceResult};

/// Lowercase alphanumerics and inner hyphens, at least two characters
static PROJECT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*[a-z0-9]$").unwrap());

/// Guidance printed when a project name is rejected
pub const PROJECT_NAME_RULES: &[&str] = &[
    "Lowercase only",
    "Alphanumeric and hyphens only",
    "Cannot start/end with hyphen",
    "At least 2 characters",
    "Example: 'my-project' or 'awesome-app'",
];

/// Check whether `name` can be used as a project name (and namespace key).
pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME_PATTERN.is_match(name)
}

/// A validated project identifier. The namespace carries the same name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(name: &str) -> NamespaceResult<Self> {
        if is_valid_project_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(NamespaceError::Validation(format!(
                "'{}' must be lowercase alphanumerics and hyphens, 2+ characters, \
                 not starting or ending with a hyphen",
                name
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace key for this project
    pub fn namespace(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProjectName {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Index metadata returned by the control plane
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDescription {
    pub name: String,
    /// Data-plane host, with or without scheme
    pub host: String,
    pub dimension: Option<u32>,
    pub metric: Option<String>,
    pub ready: bool,
}

/// Per-namespace statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    #[serde(default)]
    pub vector_count: u64,
}

/// Index-wide statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceStats>,
    #[serde(default)]
    pub dimension: Option<u32>,
    #[serde(default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub index_fullness: f32,
}

impl IndexStats {
    /// Stats for one namespace. `None` means it has never received data.
    pub fn namespace(&self, name: &str) -> Option<&NamespaceStats> {
        self.namespaces.get(name)
    }
}

/// A dense vector record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Vector {
    pub fn new(id: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            values,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Similarity query against one namespace
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub vector: Vec<f32>,
    pub top_k: u32,
    pub include_metadata: bool,
    pub include_values: bool,
}

impl QueryRequest {
    pub fn new(vector: Vec<f32>, top_k: u32) -> Self {
        Self {
            vector,
            top_k,
            include_metadata: false,
            include_values: false,
        }
    }

    pub fn with_metadata(mut self) -> Self {
        self.include_metadata = true;
        self
    }
}

/// One query hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Caller options for a provisioning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Run the write/read/delete probe
    pub verify: bool,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self { verify: true }
    }
}

/// Summary of a successful provisioning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub namespace: String,
    pub index_name: String,
    /// Vector count before anything was written, if the namespace existed
    pub existing_vector_count: Option<u64>,
    /// Whether the probe round-trip ran and succeeded
    pub verified: bool,
    /// Final vector count; `None` while stats are not available yet
    pub vector_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project_names() {
        for name in ["ab", "my-project", "awesome-app", "a1", "42", "my--project", "x-y-z"] {
            assert!(is_valid_project_name(name), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_project_names() {
        let cases = [
            "",
            "a",
            "-",
            "--",
            "-abc",
            "abc-",
            "-ab-",
            "My-Project",
            "myProject",
            "my_project",
            "my project",
            " ab",
            "ab\n",
            "café",
            "my.project",
        ];
        for name in cases {
            assert!(!is_valid_project_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_single_character_names_are_rejected() {
        for name in ["a", "z", "0", "9", "-"] {
            assert!(!is_valid_project_name(name), "{name:?} should be invalid");
        }
    }

    #[test]
    fn test_project_name_parse() {
        let name = ProjectName::parse("my-project").unwrap();
        assert_eq!(name.as_str(), "my-project");
        assert_eq!(name.namespace(), "my-project");
        assert_eq!(name.to_string(), "my-project");

        let err = "Bad-Name".parse::<ProjectName>().unwrap_err();
        assert!(matches!(err, NamespaceError::Validation(ref msg) if msg.contains("Bad-Name")));
    }

    #[test]
    fn test_index_stats_deserialize_pinecone_shape() {
        let stats: IndexStats = serde_json::from_str(
            r#"{
                "namespaces": {"my-project": {"vectorCount": 12}, "": {"vectorCount": 3}},
                "dimension": 1536,
                "indexFullness": 0.0,
                "totalVectorCount": 15
            }"#,
        )
        .unwrap();

        assert_eq!(stats.total_vector_count, 15);
        assert_eq!(stats.dimension, Some(1536));
        assert_eq!(stats.namespace("my-project").map(|s| s.vector_count), Some(12));
        assert!(stats.namespace("other").is_none());
    }

    #[test]
    fn test_index_stats_tolerates_missing_fields() {
        let stats: IndexStats = serde_json::from_str("{}").unwrap();
        assert!(stats.namespaces.is_empty());
        assert_eq!(stats.total_vector_count, 0);
    }

    #[test]
    fn test_vector_serializes_without_empty_metadata() {
        let json = serde_json::to_value(Vector::new("v1", vec![0.5, 0.25])).unwrap();
        assert_eq!(json, serde_json::json!({"id": "v1", "values": [0.5, 0.25]}));
    }
}
