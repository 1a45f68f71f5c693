use std::fmt;

use core_config::{env_optional, env_or_default, env_parse, ConfigError, FromEnv};

use crate::error::{NamespaceError, NamespaceResult};

pub const API_KEY_VAR: &str = "PINECONE_API_KEY";
pub const INDEX_NAME_VAR: &str = "PINECONE_INDEX_NAME";
pub const ENVIRONMENT_VAR: &str = "PINECONE_ENVIRONMENT";
pub const CONTROL_PLANE_URL_VAR: &str = "PINECONE_CONTROL_PLANE_URL";
pub const API_VERSION_VAR: &str = "PINECONE_API_VERSION";
pub const TIMEOUT_SECS_VAR: &str = "PINECONE_TIMEOUT_SECS";
pub const PROBE_DIMENSION_VAR: &str = "PINECONE_PROBE_DIMENSION";

pub const DEFAULT_INDEX_NAME: &str = "ora-framework-index";
pub const DEFAULT_ENVIRONMENT: &str = "us-east-1-aws";
pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_API_VERSION: &str = "2024-07";
/// OpenAI text-embedding-ada-002 / text-embedding-3-small width
pub const DEFAULT_PROBE_DIMENSION: usize = 1536;

/// Target index and connection settings
#[derive(Clone)]
pub struct IndexConfig {
    /// Checked before any remote call, not at load time
    pub api_key: Option<String>,
    pub index_name: String,
    /// Region tag, informational only
    pub environment: String,
    pub control_plane_url: String,
    pub api_version: String,
    /// No deadline when unset
    pub timeout_secs: Option<u64>,
    pub probe_dimension: usize,
}

impl IndexConfig {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_probe_dimension(mut self, dimension: usize) -> Self {
        self.probe_dimension = dimension;
        self
    }

    /// The API credential, or a configuration error naming the variable.
    pub fn require_api_key(&self) -> NamespaceResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| {
                NamespaceError::Config(format!("{} environment variable not set", API_KEY_VAR))
            })
    }
}

impl FromEnv for IndexConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let probe_dimension =
            env_parse::<usize>(PROBE_DIMENSION_VAR)?.unwrap_or(DEFAULT_PROBE_DIMENSION);
        if probe_dimension == 0 {
            return Err(ConfigError::ParseError {
                key: PROBE_DIMENSION_VAR.to_string(),
                details: "dimension must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            api_key: env_optional(API_KEY_VAR),
            index_name: env_or_default(INDEX_NAME_VAR, DEFAULT_INDEX_NAME),
            environment: env_or_default(ENVIRONMENT_VAR, DEFAULT_ENVIRONMENT),
            control_plane_url: env_or_default(CONTROL_PLANE_URL_VAR, DEFAULT_CONTROL_PLANE_URL),
            api_version: env_or_default(API_VERSION_VAR, DEFAULT_API_VERSION),
            timeout_secs: env_parse::<u64>(TIMEOUT_SECS_VAR)?,
            probe_dimension,
        })
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            control_plane_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: None,
            probe_dimension: DEFAULT_PROBE_DIMENSION,
        }
    }
}

impl fmt::Debug for IndexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("index_name", &self.index_name)
            .field("environment", &self.environment)
            .field("control_plane_url", &self.control_plane_url)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .field("probe_dimension", &self.probe_dimension)
            .finish()
    }
}
