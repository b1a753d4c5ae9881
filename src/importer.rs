//! Project import: map an external project list onto repositories.
//!
//! The projects file holds scopes, each with a list of projects carrying
//! free-form tags. Every scope becomes an organization and every project
//! a repository, except projects tagged `backpack=no`. The tag-to-
//! attribute convention is fixed - existing project inventories rely on
//! it:
//!
//! - a bare tag matching a boolean repository attribute sets it true
//!   (`private`, `issues`, `wiki`, `downloads`)
//! - a `key=value` tag matching a value attribute sets it
//!   (`description`, `homepage`, `topics`), with `topics` split on
//!   commas
//! - the full tag list is carried onto the repository

use crate::model::{Registry, RepositorySpec};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Tag that opts a project out of the import entirely.
const OPT_OUT_TAG: &str = "backpack=no";

/// The projects document.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectsFile {
    /// Scopes, each mapped to one organization.
    pub scopes: Vec<Scope>,
}

/// A scope: an organization's worth of projects.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scope {
    /// Scope name; becomes the organization name.
    pub name: String,
    /// Projects in this scope.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A project: name plus free-form tags.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    /// Project name; becomes the repository name.
    pub name: String,
    /// Free-form tags, `key=value` or bare markers.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Project {
    /// The value of a `key=value` tag, if present.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        let prefix = format!("{}=", key);
        self.tags
            .iter()
            .find_map(|tag| tag.strip_prefix(prefix.as_str()))
    }

    /// Whether a bare tag is present.
    fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Load and parse a projects file.
pub fn load_projects(path: &Path) -> Result<ProjectsFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read projects file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Invalid TOML in projects file: {}", path.display()))
}

/// Define one organization per scope, one repository per project.
pub fn import(registry: &mut Registry, projects: &ProjectsFile) -> Result<()> {
    for scope in &projects.scopes {
        let org = registry.define_organization(&scope.name)?;
        for project in &scope.projects {
            if project.has_tag(OPT_OUT_TAG) {
                log::debug!("skipping project {}: tagged {}", project.name, OPT_OUT_TAG);
                continue;
            }
            org.define_repository(&project.name, spec_from_tags(project))?;
        }
    }
    Ok(())
}

fn spec_from_tags(project: &Project) -> RepositorySpec {
    let mut spec = RepositorySpec::default();

    if project.has_tag("private") {
        spec.private = true;
    }
    if project.has_tag("issues") {
        spec.issues = true;
    }
    if project.has_tag("wiki") {
        spec.wiki = true;
    }
    if project.has_tag("downloads") {
        spec.downloads = true;
    }

    if let Some(value) = project.tag_value("description") {
        spec.description = value.to_string();
    }
    if let Some(value) = project.tag_value("homepage") {
        spec.homepage = value.to_string();
    }
    if let Some(value) = project.tag_value("topics") {
        spec.topics = value.split(',').map(str::to_string).collect();
    }

    spec.tags = project.tags.clone();
    spec
}
