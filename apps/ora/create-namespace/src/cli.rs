//! Command-line arguments

use std::ffi::OsString;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use domain_namespace::config::{
    API_KEY_VAR, DEFAULT_ENVIRONMENT, DEFAULT_INDEX_NAME, ENVIRONMENT_VAR, INDEX_NAME_VAR,
};
use domain_namespace::ProvisionOptions;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "create-namespace", version)]
#[command(about = "Create and validate the Pinecone namespace for a project")]
pub struct Cli {
    /// Project name; also used as the namespace (lowercase, digits, hyphens)
    pub project_name: Option<String>,

    /// Skip the write/read/delete probe; the namespace is created on first upsert
    #[arg(long)]
    pub no_verify: bool,

    /// Continue without asking when the namespace already holds vectors
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn options(&self) -> ProvisionOptions {
        ProvisionOptions {
            verify: !self.no_verify,
        }
    }
}

/// Parse `args`, turning argument errors into exit status 1.
///
/// `--help` and `--version` keep clap's own output and exit.
pub fn parse_args<I, T>(args: I) -> Result<Cli, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            println!("{}", usage());
            Err(ExitCode::FAILURE)
        }
    }
}

/// Text printed when no project name is given
pub fn usage() -> String {
    [
        "Usage: create-namespace <project-name> [--no-verify] [--yes] [--no-color] [-v...]".to_string(),
        String::new(),
        "Example:".to_string(),
        "  create-namespace my-awesome-project".to_string(),
        String::new(),
        "Environment Variables:".to_string(),
        format!("  {:<22} - Pinecone API key (required)", API_KEY_VAR),
        format!(
            "  {:<22} - Index name (default: {})",
            INDEX_NAME_VAR, DEFAULT_INDEX_NAME
        ),
        format!(
            "  {:<22} - Environment (default: {})",
            ENVIRONMENT_VAR, DEFAULT_ENVIRONMENT
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_verify() {
        let cli = Cli::try_parse_from(["create-namespace", "my-project"]).unwrap();
        assert_eq!(cli.project_name.as_deref(), Some("my-project"));
        assert!(cli.options().verify);
        assert!(!cli.yes);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_no_verify_anywhere_on_the_line() {
        let cli = Cli::try_parse_from(["create-namespace", "--no-verify", "my-project"]).unwrap();
        assert!(!cli.options().verify);

        let cli = Cli::try_parse_from(["create-namespace", "my-project", "--no-verify"]).unwrap();
        assert!(!cli.options().verify);
    }

    #[test]
    fn test_project_name_is_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["create-namespace"]).unwrap();
        assert!(cli.project_name.is_none());
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from(["create-namespace", "app", "-y", "--no-color", "-vv"]).unwrap();
        assert!(cli.yes);
        assert!(cli.no_color);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_usage_lists_environment() {
        let text = usage();
        assert!(text.starts_with("Usage: create-namespace <project-name>"));
        assert!(text.contains("[--no-color] [-v...]"));
        assert!(text.contains("PINECONE_API_KEY"));
        assert!(text.contains("default: ora-framework-index"));
        assert!(text.contains("default: us-east-1-aws"));
    }

    fn assert_failure(result: Result<Cli, ExitCode>) {
        let code = result.expect_err("arguments should be rejected");
        assert_eq!(format!("{:?}", code), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn test_extra_positional_exits_one() {
        assert_failure(parse_args(["create-namespace", "my-project", "extra"]));
    }

    #[test]
    fn test_unknown_flag_exits_one() {
        assert_failure(parse_args(["create-namespace", "my-project", "--bogus"]));
    }

    #[test]
    fn test_parse_args_accepts_valid_line() {
        let cli = parse_args(["create-namespace", "my-project", "-y"]).unwrap();
        assert_eq!(cli.project_name.as_deref(), Some("my-project"));
        assert!(cli.yes);
    }
}
