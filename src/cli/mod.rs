//! # CLI Module
//!
//! Command-line tooling for route manifests.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Load a manifest, compile every pattern route and make sure each service
//! name resolves. Exits non-zero on the first problem:
//!
//! ```bash
//! switchyard check --manifest routes.yaml
//! ```
//!
//! ### `routes`
//!
//! List registered routes with their kind and methods.
//!
//! ### `match`
//!
//! Show which route a request would hit and what it captures, as JSON:
//!
//! ```bash
//! switchyard match --manifest routes.yaml --method GET /cats/42
//! ```
//!
//! ### `respond`
//!
//! Dispatch a request through the full pipeline against the built-in demo
//! services (`echo`, `hello`, `not_found`, plus the `tracing` middleware)
//! and print the raw HTTP response.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use switchyard::cli::{run, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! run(&cli, &mut std::io::stdout())?;
//! ```

mod commands;
mod demo;


pub use commands::{run, run_cli, Cli, Commands};
pub use demo::demo_dispatcher;
