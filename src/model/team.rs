//! Teams within an organization.

use super::Permission;
use serde::Deserialize;

/// Declared attributes of a team.
///
/// Unknown keys in a configuration file are rejected at load time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeamSpec {
    /// Default permission for repositories the team gets access to.
    pub permission: Permission,
}

/// A team in the desired-state graph.
#[derive(Debug, Clone)]
pub struct Team {
    /// Team name, unique within its organization.
    pub name: String,
    /// Default permission level.
    pub permission: Permission,
    /// Remote identifier. Starts unset and is bound during a convergence
    /// run once the team is matched or created remotely; it is only
    /// valid after that point in the run, never across runs.
    pub github_id: Option<u64>,
}

impl Team {
    pub(crate) fn new(name: &str, spec: TeamSpec) -> Self {
        Self {
            name: name.to_string(),
            permission: spec.permission,
            github_id: None,
        }
    }
}
