use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::{IndexConfig, INDEX_NAME_VAR};
use crate::confirm::{Confirmation, StdinConfirmation};
use crate::error::{NamespaceError, NamespaceResult};
use crate::models::{
    NamespaceStats, ProjectName, ProvisionOptions, ProvisionReport, QueryRequest,
    PROJECT_NAME_RULES,
};
use crate::probe::{probe_vector, PROBE_VECTOR_ID};
use crate::report::{Reporter, TracingReporter};
use crate::repository::IndexRepository;

const RULE_WIDTH: usize = 80;

/// Prompt shown before writing into a namespace that already has vectors
pub const CONTINUE_PROMPT: &str = "Namespace has existing vectors. Continue anyway? (y/N):";

/// Namespace provisioning service
///
/// Runs the provisioning steps strictly in order, stopping at the first
/// failure: validate input, look up the index, inspect existing stats,
/// confirm if the namespace already holds data, probe (or skip), report.
pub struct NamespaceService<R: IndexRepository> {
    repository: R,
    config: IndexConfig,
    confirmation: Arc<dyn Confirmation>,
    reporter: Arc<dyn Reporter>,
}

impl<R: IndexRepository> NamespaceService<R> {
    pub fn new(repository: R, config: IndexConfig) -> Self {
        Self {
            repository,
            config,
            confirmation: Arc::new(StdinConfirmation),
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_confirmation(mut self, confirmation: Arc<dyn Confirmation>) -> Self {
        self.confirmation = confirmation;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Create and validate the namespace for `project_name`.
    ///
    /// Every failure is reported through the reporter before it is returned,
    /// so callers only need to map `Err` to an exit status.
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn create_namespace(
        &self,
        project_name: &str,
        options: ProvisionOptions,
    ) -> NamespaceResult<ProvisionReport> {
        let project = self.validate_input(project_name)?;
        let namespace = project.namespace();
        let index = self.config.index_name.as_str();

        self.print_banner(&project);

        self.check_index().await?;

        let existing = match self.namespace_stats(namespace).await {
            Ok(stats) => stats,
            Err(e) => {
                self.reporter
                    .error(&format!("Failed to get namespace stats: {}", e));
                return Err(e);
            }
        };

        if let Some(stats) = &existing {
            self.reporter.warning(&format!(
                "Namespace '{}' already exists ({} vectors)",
                namespace, stats.vector_count
            ));

            if stats.vector_count > 0 && !self.confirmation.confirm(CONTINUE_PROMPT) {
                info!(namespace, "Operator declined to continue");
                self.reporter.line("Aborted");
                return Err(NamespaceError::Aborted);
            }
        }

        if options.verify {
            self.reporter
                .info("Verifying namespace (this creates it if it doesn't exist)...");
            if let Err(e) = self.verify_namespace(&project).await {
                self.reporter.error(&e.to_string());
                self.reporter.error("Namespace verification failed");
                return Err(e);
            }
            self.reporter.success("Namespace verified and accessible");
        } else {
            // Nothing is written, so nothing confirms the namespace is reachable.
            self.reporter
                .info("Namespace will be created on first vector upsert");
        }

        let vector_count = self.report_final_stats(namespace).await;

        info!(namespace, index, verified = options.verify, "Namespace provisioned");

        Ok(ProvisionReport {
            namespace: namespace.to_string(),
            index_name: index.to_string(),
            existing_vector_count: existing.map(|s| s.vector_count),
            verified: options.verify,
            vector_count,
        })
    }

    /// Write, read back and delete a probe vector in `namespace`.
    ///
    /// Any failing step aborts verification without retry. When the upsert
    /// succeeded but the query fails or finds nothing, the probe is left in
    /// the namespace.
    #[instrument(skip(self), fields(index = %self.config.index_name))]
    pub async fn verify_namespace(&self, namespace: &ProjectName) -> NamespaceResult<()> {
        let index = self.config.index_name.as_str();
        let namespace = namespace.namespace();
        let probe = probe_vector(self.config.probe_dimension);

        self.reporter.info("Upserting test vector...");
        let upserted = self
            .repository
            .upsert(index, namespace, vec![probe.clone()])
            .await
            .map_err(|e| NamespaceError::verification("upsert", e))?;
        debug!(upserted, "Probe upserted");

        self.reporter.info("Querying test vector...");
        let matches = self
            .repository
            .query(
                index,
                namespace,
                QueryRequest::new(probe.values, 1).with_metadata(),
            )
            .await
            .map_err(|e| NamespaceError::verification("query", e))?;

        let Some(top) = matches.first() else {
            warn!(namespace, "Probe vector not returned by query");
            return Err(NamespaceError::Verification(
                "test vector was not returned by query (the index may still be catching up)"
                    .to_string(),
            ));
        };
        if top.id != PROBE_VECTOR_ID {
            debug!(top = %top.id, "Top match is not the probe vector");
        }

        self.reporter.info("Deleting test vector...");
        self.repository
            .delete(index, namespace, vec![PROBE_VECTOR_ID.to_string()])
            .await
            .map_err(|e| NamespaceError::verification("delete", e))?;

        Ok(())
    }

    /// Stats for one namespace; `None` if it has never received data.
    pub async fn namespace_stats(&self, namespace: &str) -> NamespaceResult<Option<NamespaceStats>> {
        let stats = self
            .repository
            .describe_stats(&self.config.index_name)
            .await?;
        Ok(stats.namespace(namespace).cloned())
    }

    fn validate_input(&self, project_name: &str) -> NamespaceResult<ProjectName> {
        if let Err(e) = self.config.require_api_key() {
            if let NamespaceError::Config(msg) = &e {
                self.reporter.error(msg);
            }
            return Err(e);
        }

        ProjectName::parse(project_name).inspect_err(|_| {
            self.reporter.error("Invalid project name format");
            self.reporter.line("Project name must be:");
            for rule in PROJECT_NAME_RULES {
                self.reporter.line(&format!("  - {}", rule));
            }
        })
    }

    fn print_banner(&self, project: &ProjectName) {
        let rule = "=".repeat(RULE_WIDTH);
        self.reporter.heading(&rule);
        self.reporter.heading("  VECTOR NAMESPACE CREATION");
        self.reporter.heading(&rule);
        self.reporter.blank();
        self.reporter
            .line(&format!("Project Name: {}", project.as_str()));
        self.reporter
            .line(&format!("Namespace:    {}", project.namespace()));
        self.reporter
            .line(&format!("Index:        {}", self.config.index_name));
        self.reporter
            .line(&format!("Environment:  {}", self.config.environment));
        self.reporter.heading(&rule);
        self.reporter.blank();
    }

    async fn check_index(&self) -> NamespaceResult<()> {
        let index = self.config.index_name.as_str();
        self.reporter
            .info(&format!("Connecting to index '{}'...", index));

        match self.repository.describe_index(index).await {
            Ok(description) => {
                self.reporter.success(&format!("Index '{}' found", index));
                if !description.ready {
                    self.reporter
                        .warning(&format!("Index '{}' is not reporting ready", index));
                }
                if let Some(dimension) = description.dimension {
                    if dimension as usize != self.config.probe_dimension {
                        self.reporter.warning(&format!(
                            "Index dimension is {} but probe vectors use {}",
                            dimension, self.config.probe_dimension
                        ));
                    }
                }
                Ok(())
            }
            Err(e) => {
                match &e {
                    NamespaceError::IndexNotFound(_) => {
                        self.reporter.error(&format!("Index '{}' not found", index));
                    }
                    other => {
                        self.reporter
                            .error(&format!("Failed to reach index '{}': {}", index, other));
                    }
                }
                self.reporter.line(&format!(
                    "Create the index first or set {} to an existing index",
                    INDEX_NAME_VAR
                ));
                Err(e)
            }
        }
    }

    async fn report_final_stats(&self, namespace: &str) -> Option<u64> {
        let stats = match self.namespace_stats(namespace).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Final stats unavailable");
                self.reporter
                    .warning(&format!("Failed to get namespace stats: {}", e));
                None
            }
        };

        let Some(stats) = stats else {
            self.reporter
                .warning("Namespace created but stats not available yet");
            self.reporter.line(
                "This is normal - namespace will be fully available after first upsert",
            );
            return None;
        };

        self.reporter.blank();
        self.reporter.success("Namespace ready!");
        self.reporter.line(&format!("  Namespace: {}", namespace));
        self.reporter
            .line(&format!("  Vectors:   {}", stats.vector_count));
        self.reporter.blank();
        self.reporter.line("Next Steps:");
        self.reporter.line(&format!(
            "  1. Update application to use namespace: {}",
            namespace
        ));
        self.reporter
            .line("  2. Always specify namespace in queries/upserts");
        self.reporter.line("  3. Tag vectors with project metadata");

        Some(stats.vector_count)
    }
}
