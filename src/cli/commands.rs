use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::json;

use super::demo::demo_dispatcher;
use crate::dispatcher::Dispatchable;
use crate::manifest::{load_manifest, RouteManifest};
use crate::router::{RouteTable, Router};
use crate::runtime_config::RuntimeConfig;
use crate::server::{Request, Server};

/// Command-line interface for switchyard route manifests
#[derive(Parser, Debug)]
#[command(name = "switchyard", version)]
#[command(about = "Route manifest tooling", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a manifest: patterns compile and every service resolves
    Check {
        /// Path to the route manifest (YAML or TOML)
        #[arg(short, long, env = "SWITCHYARD_MANIFEST")]
        manifest: PathBuf,
    },
    /// List the routes a manifest registers
    Routes {
        /// Path to the route manifest (YAML or TOML)
        #[arg(short, long, env = "SWITCHYARD_MANIFEST")]
        manifest: PathBuf,
    },
    /// Show the route and captures for a request target, as JSON
    Match {
        /// Path to the route manifest (YAML or TOML)
        #[arg(short, long, env = "SWITCHYARD_MANIFEST")]
        manifest: PathBuf,

        /// Request method
        #[arg(long, default_value = "GET")]
        method: String,

        /// Request target (path and optional query)
        target: String,
    },
    /// Dispatch a request against the demo services and print the response
    Respond {
        /// Path to the route manifest (YAML or TOML)
        #[arg(short, long, env = "SWITCHYARD_MANIFEST")]
        manifest: PathBuf,

        /// Request method
        #[arg(long, default_value = "GET")]
        method: String,

        /// Request target (path and optional query)
        target: String,
    },
}

/// Parse arguments and run against stdout.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &mut out)
}

/// Execute `cli`, writing command output to `out`.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, a pattern fails to
/// compile, a service name does not resolve, or writing to `out` fails.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let config = RuntimeConfig::from_env();
    match &cli.command {
        Commands::Check { manifest } => {
            let loaded = load_manifest(manifest)?;
            let router = build_router(&loaded, &config);
            router
                .table()
                .validate()
                .with_context(|| format!("invalid route in {}", manifest.display()))?;
            let missing = loaded.unresolved_services(router.dispatcher());
            if !missing.is_empty() {
                bail!("unresolved services: {}", missing.join(", "));
            }
            writeln!(
                out,
                "ok: {} routes, {} middleware",
                router.table().len(),
                loaded.middleware.len()
            )?;
            Ok(())
        }
        Commands::Routes { manifest } => {
            let loaded = load_manifest(manifest)?;
            let router = build_router(&loaded, &config);
            for route in router.table().routes() {
                let methods: Vec<_> = route.methods().tokens().collect();
                writeln!(
                    out,
                    "{:<8} {:<24} {}",
                    route.kind(),
                    methods.join(","),
                    route.target()
                )?;
            }
            Ok(())
        }
        Commands::Match {
            manifest,
            method,
            target,
        } => {
            let loaded = load_manifest(manifest)?;
            let router = build_router(&loaded, &config);
            let req = Request::new(parse_method(method)?, target.as_str());
            let report = match router.route(&req)? {
                Some(m) => {
                    let captures: serde_json::Map<String, serde_json::Value> = m
                        .captures
                        .iter()
                        .map(|(name, value)| (name.to_string(), json!(value)))
                        .collect();
                    json!({
                        "method": req.method().as_str(),
                        "target": req.target(),
                        "route": m.route.target(),
                        "kind": m.route.kind(),
                        "methods": m.route.methods().tokens().collect::<Vec<_>>(),
                        "allow": m.route.methods().allowed_methods(),
                        "captures": captures,
                    })
                }
                None => json!({
                    "method": req.method().as_str(),
                    "target": req.target(),
                    "route": null,
                }),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            Ok(())
        }
        Commands::Respond {
            manifest,
            method,
            target,
        } => {
            let loaded = load_manifest(manifest)?;
            let router = build_router(&loaded, &config);
            let mut server = Server::new(Arc::clone(router.dispatcher()), &config);
            server.add(Dispatchable::from_double_pass(router));
            let req = Request::new(parse_method(method)?, target.as_str());
            server.respond_once(req, out)?;
            Ok(())
        }
    }
}

fn build_router(manifest: &RouteManifest, config: &RuntimeConfig) -> Router {
    let dispatcher = Arc::new(demo_dispatcher(config));
    manifest.build_router_with_table(dispatcher, RouteTable::with_template_pattern(&config.template_pattern))
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.trim().to_uppercase().as_bytes())
        .with_context(|| format!("invalid method '{method}'"))
}
