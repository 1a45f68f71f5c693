//! Wiring: configuration, repository, capabilities, exit status

use std::process::ExitCode;
use std::sync::Arc;

use core_config::FromEnv;
use domain_namespace::{
    AutoConfirm, Confirmation, IndexConfig, IndexRepository, NamespaceResult, NamespaceService,
    PineconeRepository, ProvisionReport, Reporter, StdinConfirmation,
};
use eyre::{Result, WrapErr};
use tracing::{debug, info};

use crate::cli::{usage, Cli};
use crate::console::TerminalReporter;

/// Map a provisioning result onto the process exit status
pub fn exit_status(result: &NamespaceResult<ProvisionReport>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

/// Run against the Pinecone index configured in the environment
pub async fn run(cli: Cli) -> Result<ExitCode> {
    if cli.project_name.is_none() {
        println!("{}", usage());
        return Ok(ExitCode::FAILURE);
    }

    let config = IndexConfig::from_env().wrap_err("Failed to load index configuration")?;
    debug!(?config, "Loaded index configuration");

    let repository =
        PineconeRepository::new(config.clone()).wrap_err("Failed to create Pinecone client")?;
    let reporter = Arc::new(TerminalReporter::detect(cli.no_color));

    Ok(run_with(&cli, repository, config, reporter).await)
}

/// Run one provisioning pass with explicit collaborators
pub async fn run_with<R: IndexRepository>(
    cli: &Cli,
    repository: R,
    config: IndexConfig,
    reporter: Arc<dyn Reporter>,
) -> ExitCode {
    let Some(project_name) = cli.project_name.as_deref() else {
        reporter.line(&usage());
        return ExitCode::FAILURE;
    };

    let confirmation: Arc<dyn Confirmation> = if cli.yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(StdinConfirmation)
    };

    let service = NamespaceService::new(repository, config)
        .with_confirmation(confirmation)
        .with_reporter(reporter);

    let result = service.create_namespace(project_name, cli.options()).await;
    match &result {
        Ok(report) => info!(?report, "Provisioning finished"),
        Err(e) => debug!(error = %e, "Provisioning failed"),
    }

    ExitCode::from(exit_status(&result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_namespace::{
        InMemoryIndexRepository, NamespaceError, RecordingReporter, ReportLevel,
    };

    const INDEX: &str = "ora-framework-index";

    fn cli(project: &str) -> Cli {
        Cli {
            project_name: Some(project.to_string()),
            yes: true,
            ..Cli::default()
        }
    }

    fn config() -> IndexConfig {
        IndexConfig::new(INDEX)
            .with_api_key("pc-test-key")
            .with_probe_dimension(8)
    }

    #[test]
    fn test_exit_status_mapping() {
        let ok = Ok(ProvisionReport {
            namespace: "app".to_string(),
            index_name: INDEX.to_string(),
            existing_vector_count: None,
            verified: true,
            vector_count: Some(0),
        });
        assert_eq!(exit_status(&ok), 0);

        for err in [
            NamespaceError::Config("missing".into()),
            NamespaceError::Validation("bad".into()),
            NamespaceError::IndexNotFound(INDEX.into()),
            NamespaceError::Verification("no match".into()),
            NamespaceError::Aborted,
            NamespaceError::Internal("?".into()),
        ] {
            assert_eq!(exit_status(&Err(err)), 1);
        }
    }

    #[tokio::test]
    async fn test_missing_project_name_prints_usage() {
        let reporter = Arc::new(RecordingReporter::new());
        let repo = InMemoryIndexRepository::new().with_index(INDEX, 8);

        let code = run_with(&Cli::default(), repo, config(), reporter.clone()).await;

        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
        assert!(reporter.contains("Usage: create-namespace"));
    }

    #[tokio::test]
    async fn test_successful_run_exits_zero() {
        let reporter = Arc::new(RecordingReporter::new());
        let repo = InMemoryIndexRepository::new().with_index(INDEX, 8);

        let code = run_with(&cli("my-project"), repo, config(), reporter.clone()).await;

        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::SUCCESS));
        assert!(reporter.messages(ReportLevel::Error).is_empty());
    }

    #[tokio::test]
    async fn test_invalid_name_exits_one() {
        let reporter = Arc::new(RecordingReporter::new());
        let repo = InMemoryIndexRepository::new().with_index(INDEX, 8);

        let code = run_with(&cli("-bad-"), repo, config(), reporter.clone()).await;

        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
        assert!(reporter.contains("Invalid project name format"));
    }

    #[tokio::test]
    async fn test_missing_api_key_exits_one() {
        let reporter = Arc::new(RecordingReporter::new());
        let repo = InMemoryIndexRepository::new().with_index(INDEX, 8);

        let code = run_with(&cli("my-project"), repo, IndexConfig::new(INDEX), reporter.clone()).await;

        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
        assert!(reporter.contains("PINECONE_API_KEY"));
    }
}
