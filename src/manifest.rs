//! # Route Manifest
//!
//! Declarative route tables in YAML or TOML. The format is picked from the
//! file extension (`.yaml`/`.yml` or `.toml`).
//!
//! ```yaml
//! routes:
//!   - method: GET,POST
//!     target: /cats/{id}
//!     service: cat_handler
//! middleware: [request_log]
//! ```
//!
//! Every route and middleware entry becomes a
//! [`Dispatchable::service`](crate::dispatcher::Dispatchable::service), so the
//! names are resolved by the dispatcher at request time.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dispatcher::{Dispatchable, Dispatcher};
use crate::router::{RouteTable, Router, ANY_METHOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Toml,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(ManifestFormat::Yaml),
            Some("toml") => Ok(ManifestFormat::Toml),
            other => bail!(
                "unsupported manifest extension {:?} for {} (expected .yaml, .yml or .toml)",
                other.unwrap_or(""),
                path.display()
            ),
        }
    }
}

/// One `method target → service` line of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Comma-separated verbs or `*`
    #[serde(default = "any_method")]
    pub method: String,
    pub target: String,
    pub service: String,
}

fn any_method() -> String {
    ANY_METHOD.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
    /// Router-local middleware, run in order before the matched route
    #[serde(default)]
    pub middleware: Vec<String>,
}

/// Read and parse a manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<RouteManifest> {
    let path = path.as_ref();
    let format = ManifestFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest = parse_manifest(&content, format)
        .with_context(|| format!("failed to parse manifest {}", path.display()))?;
    info!(
        manifest = %path.display(),
        routes = manifest.routes.len(),
        middleware = manifest.middleware.len(),
        "Route manifest loaded"
    );
    Ok(manifest)
}

pub fn parse_manifest(content: &str, format: ManifestFormat) -> Result<RouteManifest> {
    let manifest: RouteManifest = match format {
        ManifestFormat::Yaml => serde_yaml::from_str(content)?,
        ManifestFormat::Toml => toml::from_str(content)?,
    };
    manifest.check_entries()?;
    Ok(manifest)
}

impl RouteManifest {
    fn check_entries(&self) -> Result<()> {
        for (i, entry) in self.routes.iter().enumerate() {
            if entry.target.trim().is_empty() {
                bail!("route #{i}: empty target");
            }
            if entry.service.trim().is_empty() {
                bail!("route #{i} ({}): empty service name", entry.target);
            }
            if entry.method.split(',').all(|token| token.trim().is_empty()) {
                bail!("route #{i} ({}): empty method list", entry.target);
            }
        }
        if let Some(pos) = self.middleware.iter().position(|m| m.trim().is_empty()) {
            bail!("middleware #{pos}: empty service name");
        }
        Ok(())
    }

    /// Build a router with the default template variable pattern.
    #[must_use]
    pub fn build_router(&self, dispatcher: Arc<Dispatcher>) -> Router {
        self.build_router_with_table(dispatcher, RouteTable::new())
    }

    /// Build a router on top of an existing (usually empty) table.
    #[must_use]
    pub fn build_router_with_table(&self, dispatcher: Arc<Dispatcher>, table: RouteTable) -> Router {
        let mut router = Router::with_table(dispatcher, table);
        for entry in &self.routes {
            router.register(
                &entry.method,
                &entry.target,
                Dispatchable::service(entry.service.trim()),
            );
        }
        for name in &self.middleware {
            router.add_middleware(Dispatchable::service(name.trim()));
        }
        router
    }

    /// Route and middleware names `dispatcher` cannot resolve, in manifest order.
    #[must_use]
    pub fn unresolved_services(&self, dispatcher: &Dispatcher) -> Vec<&str> {
        let mut missing: Vec<&str> = Vec::new();
        let names = self
            .routes
            .iter()
            .map(|entry| entry.service.trim())
            .chain(self.middleware.iter().map(|name| name.trim()));
        for name in names {
            if !dispatcher.can_resolve(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("routes.yml")).unwrap(),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("routes.toml")).unwrap(),
            ManifestFormat::Toml
        );
        assert!(ManifestFormat::from_path(Path::new("routes.json")).is_err());
    }

    #[test]
    fn test_parse_yaml_defaults_method() {
        let manifest = parse_manifest(
            "routes:\n  - target: /cats\n    service: cats\n",
            ManifestFormat::Yaml,
        )
        .unwrap();
        assert_eq!(manifest.routes[0].method, "*");
        assert!(manifest.middleware.is_empty());
    }

    #[test]
    fn test_parse_toml() {
        let manifest = parse_manifest(
            r#"
middleware = ["tracing"]

[[routes]]
method = "GET,HEAD"
target = "/cats/{id}"
service = "cat"
"#,
            ManifestFormat::Toml,
        )
        .unwrap();
        assert_eq!(manifest.routes[0].target, "/cats/{id}");
        assert_eq!(manifest.middleware, vec!["tracing"]);
    }

    #[test]
    fn test_rejects_empty_service() {
        let err = parse_manifest(
            "routes:\n  - target: /cats\n    service: ''\n",
            ManifestFormat::Yaml,
        )
        .unwrap_err();
        assert!(err.to_string().contains("empty service"));
    }

    #[test]
    fn test_unresolved_services_deduplicated() {
        let manifest = parse_manifest(
            "routes:\n  - {target: /a, service: ghost}\n  - {target: /b, service: ghost}\nmiddleware: [spooky]\n",
            ManifestFormat::Yaml,
        )
        .unwrap();
        assert_eq!(
            manifest.unresolved_services(&Dispatcher::new()),
            vec!["ghost", "spooky"]
        );
    }
}
