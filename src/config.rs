//! Configuration loading: a TOML document describing the desired state.
//!
//! The file declares organizations with their teams, repositories and
//! hooks, plus run settings and an optional projects file to import.
//! Unknown keys anywhere in the document are rejected with an error
//! naming the key, so typos never silently become defaults.

use crate::engine::UnmanagedTeams;
use crate::model::{Registry, RepositorySpec, TeamSpec};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// The backpack configuration document.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackpackConfig {
    /// Run settings.
    pub settings: Settings,

    /// Optional project import.
    pub import: Option<ImportConfig>,

    /// Organizations by name.
    pub organizations: BTreeMap<String, OrgConfig>,
}

/// Run settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Policy for remote teams no desired-state team claims.
    pub on_unmanaged_teams: UnmanagedTeams,
}

/// Project import settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Path to the projects file, resolved like the config path.
    pub projects: String,
}

/// One organization's declarations.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrgConfig {
    /// Teams by name.
    pub teams: BTreeMap<String, TeamSpec>,

    /// Repositories by name.
    pub repositories: BTreeMap<String, RepositorySpec>,
}

impl BackpackConfig {
    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in config file: {}", path.display()))
    }

    /// Build the desired-state graph into a registry.
    ///
    /// Teams are defined before repositories so access lists resolve.
    pub fn build(&self, registry: &mut Registry) -> Result<()> {
        for (org_name, org_config) in &self.organizations {
            let org = registry.define_organization(org_name)?;
            for (name, spec) in &org_config.teams {
                org.define_team(name, spec.clone())?;
            }
            for (name, spec) in &org_config.repositories {
                org.define_repository(name, spec.clone())?;
            }
        }
        Ok(())
    }
}
