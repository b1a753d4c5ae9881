//! Desired-state model for GitHub organizations.
//!
//! The model is a pure in-memory graph: a [`Registry`] owns
//! [`Organization`]s, an organization owns [`Team`]s and
//! [`Repository`]s, and a repository owns its [`RepositoryHook`]s.
//! Team-repository access is a single edge map on the repository
//! (team name -> [`Permission`]), so a team can hold exactly one
//! effective permission per repository.
//!
//! The graph is built completely - by the config loader, the importer,
//! or programmatically - before any remote call is made, and is
//! read-only during convergence except for the `github_id` binding on
//! [`Team`].

use anyhow::{Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

pub mod hook;
pub mod organization;
pub mod repository;
pub mod team;

pub use hook::{HookSpec, RepositoryHook};
pub use organization::Organization;
pub use repository::{Repository, RepositorySpec};
pub use team::{Team, TeamSpec};

/// Access tier a team has on a repository.
///
/// Variant order matters: it encodes the admin > push > pull precedence,
/// so the highest of two levels is the effective one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read access.
    #[default]
    Pull,
    /// Read-write access.
    Push,
    /// Full control.
    Admin,
}

impl Permission {
    /// The API's permission string for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Push => "push",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-owned registry of organizations.
///
/// An organization is defined once and lives for the duration of the
/// run; redefining a name is an error.
#[derive(Debug, Default)]
pub struct Registry {
    organizations: BTreeMap<String, Organization>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a new organization and return it for population.
    pub fn define_organization(&mut self, name: &str) -> Result<&mut Organization> {
        if self.organizations.contains_key(name) {
            bail!("organization '{}' is already defined", name);
        }
        Ok(self
            .organizations
            .entry(name.to_string())
            .or_insert_with(|| Organization::new(name)))
    }

    /// Whether an organization with this name is defined.
    pub fn has_organization(&self, name: &str) -> bool {
        self.organizations.contains_key(name)
    }

    /// Look up an organization, failing if it does not exist.
    pub fn organization(&self, name: &str) -> Result<&Organization> {
        match self.organizations.get(name) {
            Some(org) => Ok(org),
            None => bail!("no organization named '{}' is defined", name),
        }
    }

    /// Mutable lookup, failing if the organization does not exist.
    pub fn organization_mut(&mut self, name: &str) -> Result<&mut Organization> {
        match self.organizations.get_mut(name) {
            Some(org) => Ok(org),
            None => bail!("no organization named '{}' is defined", name),
        }
    }

    /// All organizations, in name order.
    pub fn organizations(&self) -> impl Iterator<Item = &Organization> {
        self.organizations.values()
    }

    /// All organizations, mutable, in name order.
    pub fn organizations_mut(&mut self) -> impl Iterator<Item = &mut Organization> {
        self.organizations.values_mut()
    }

    /// Number of defined organizations.
    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    /// Whether no organization is defined.
    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}
