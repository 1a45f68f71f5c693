//! Namespace provisioning CLI
//!
//! Creates and validates the Pinecone namespace for a project so that the
//! project's embeddings stay isolated inside the shared index.
//!
//! ## Flow
//!
//! ```text
//! argv ──▶ Cli (clap)
//!            │
//!            ▼
//!     runner::run ── IndexConfig::from_env
//!            │
//!            ▼
//!     NamespaceService ──▶ PineconeRepository ──▶ Pinecone REST API
//!            │
//!            ├──▶ StdinConfirmation / AutoConfirm (--yes)
//!            └──▶ TerminalReporter (stdout)
//! ```
//!
//! ## Modules
//!
//! - `cli`: argument definitions and usage text
//! - `console`: coloured terminal reporter
//! - `runner`: wiring and exit-status mapping

pub mod cli;
pub mod console;
pub mod runner;

pub use cli::{parse_args, Cli};
pub use runner::{run, run_with};
