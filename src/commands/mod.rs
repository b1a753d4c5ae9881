//! Command implementations.

use crate::config::BackpackConfig;
use crate::model::Registry;
use crate::{importer, ui};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod converge;
pub mod show;
pub mod validate;

/// Expand a user-supplied path.
fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Load the configuration and build the full desired-state graph,
/// including the project import when one is configured.
///
/// A missing configuration file is an operator mistake, not a bug:
/// print instructions and exit non-zero instead of dumping an error
/// chain.
pub(crate) fn load_graph(config_path: &str) -> Result<(BackpackConfig, Registry)> {
    let path = expand(config_path);
    if !path.exists() {
        ui::error(&format!(
            "Expected to find configuration file {} to drive backpack.",
            path.display()
        ));
        ui::error("Please create such a file before re-running the backpack command.");
        std::process::exit(1);
    }

    let config = BackpackConfig::load(&path)?;
    let mut registry = Registry::new();
    config.build(&mut registry)?;

    if let Some(import) = &config.import {
        let projects_path = resolve_sibling(&path, &import.projects);
        let projects = importer::load_projects(&projects_path)?;
        importer::import(&mut registry, &projects)?;
    }

    Ok((config, registry))
}

/// Resolve a path from the config file: absolute and `~` paths stand
/// alone, relative paths are siblings of the config file.
fn resolve_sibling(config_path: &Path, value: &str) -> PathBuf {
    let expanded = expand(value);
    if expanded.is_absolute() {
        expanded
    } else {
        config_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_sibling_relative() {
        let resolved = resolve_sibling(Path::new("/etc/backpack/backpack.toml"), "projects.toml");
        assert_eq!(resolved, Path::new("/etc/backpack/projects.toml"));
    }

    #[test]
    fn test_resolve_sibling_absolute() {
        let resolved = resolve_sibling(Path::new("/etc/backpack/backpack.toml"), "/srv/p.toml");
        assert_eq!(resolved, Path::new("/srv/p.toml"));
    }

    #[test]
    fn test_load_graph_with_import() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("backpack.toml");
        let mut config = std::fs::File::create(&config_path).unwrap();
        writeln!(config, "[import]\nprojects = \"projects.toml\"").unwrap();
        let mut projects = std::fs::File::create(dir.path().join("projects.toml")).unwrap();
        writeln!(
            projects,
            "[[scopes]]\nname = \"acme\"\n[[scopes.projects]]\nname = \"svc\"\ntags = [\"issues\"]"
        )
        .unwrap();

        let (_, registry) = load_graph(config_path.to_str().unwrap()).unwrap();
        let svc = registry
            .organization("acme")
            .unwrap()
            .repository("svc")
            .unwrap();
        assert!(svc.issues);
    }
}
