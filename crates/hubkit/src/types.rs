//! Wire types for the GitHub management API.
//!
//! These mirror the JSON the v3 REST API returns for the resources
//! backpack manages: teams, repositories, team-repository permission
//! assignments and repository hooks. Fields the convergence engine does
//! not look at are simply not declared.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A team as returned by the organization or repository team listings.
///
/// In a repository team listing, `permission` is the team's role on that
/// repository; in an organization listing it is the team's default
/// permission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTeam {
    /// Remote identifier.
    pub id: u64,
    /// Team name.
    pub name: String,
    /// Permission string (`pull`, `push` or `admin`).
    pub permission: String,
}

/// A repository as returned by the organization repository listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteRepository {
    /// Repository name without the owner.
    pub name: String,
    /// Full `owner/name` identifier.
    pub full_name: String,
    /// Description; the API reports `null` when unset.
    #[serde(default)]
    pub description: Option<String>,
    /// Homepage URL; the API reports `null` when unset.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Whether the issue tracker is enabled.
    #[serde(default)]
    pub has_issues: bool,
    /// Whether the wiki is enabled.
    #[serde(default)]
    pub has_wiki: bool,
    /// Whether downloads are enabled.
    #[serde(default)]
    pub has_downloads: bool,
}

/// Fields sent when creating or editing a repository.
///
/// One combined document per call; the API has no per-field patch for
/// these attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryPatch {
    /// Description (empty string, never null).
    pub description: String,
    /// Homepage URL (empty string, never null).
    pub homepage: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the issue tracker is enabled.
    pub has_issues: bool,
    /// Whether the wiki is enabled.
    pub has_wiki: bool,
    /// Whether downloads are enabled.
    pub has_downloads: bool,
}

/// Permission flags on a repository row in a team permissions listing.
///
/// Exactly one flag is set: the flag for the level the team was granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PermissionFlags {
    /// Admin access.
    #[serde(default)]
    pub admin: bool,
    /// Push access.
    #[serde(default)]
    pub push: bool,
    /// Pull access.
    #[serde(default)]
    pub pull: bool,
}

impl PermissionFlags {
    /// Flags with only the named level set.
    ///
    /// Unknown permission strings produce no flags at all, which reads
    /// as "not granted" everywhere the flags are consulted.
    pub fn exact(permission: &str) -> Self {
        Self {
            admin: permission == "admin",
            push: permission == "push",
            pull: permission == "pull",
        }
    }

    /// Whether the flag for the named level is set.
    pub fn has(&self, permission: &str) -> bool {
        match permission {
            "admin" => self.admin,
            "push" => self.push,
            "pull" => self.pull,
            _ => false,
        }
    }
}

/// A repository row from a team permissions listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamRepository {
    /// Repository name without the owner.
    pub name: String,
    /// Full `owner/name` identifier.
    pub full_name: String,
    /// Granted permission flags.
    #[serde(default)]
    pub permissions: PermissionFlags,
}

/// A repository hook as returned by the hook listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteHook {
    /// Remote identifier.
    pub id: u64,
    /// Hook name (unique per repository for named service hooks).
    pub name: String,
    /// Whether the hook fires.
    #[serde(default)]
    pub active: bool,
    /// Subscribed event names, in no particular order.
    #[serde(default)]
    pub events: Vec<String>,
    /// Hook configuration. Secret-bearing keys come back redacted.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}
