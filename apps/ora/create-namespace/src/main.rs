//! create-namespace - Entry Point
//!
//! Exit status 0 when the namespace is ready, 1 on any failure.

use std::process::ExitCode;

use core_config::tracing::{init_cli_tracing, install_color_eyre};
use core_config::Environment;
use create_namespace::parse_args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<ExitCode> {
    install_color_eyre();

    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return Ok(code),
    };
    init_cli_tracing(&Environment::from_env(), cli.verbose);

    create_namespace::run(cli).await
}
