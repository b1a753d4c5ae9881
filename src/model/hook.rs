//! Repository webhooks.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Declared attributes of a repository hook.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HookSpec {
    /// Hook type; defaults to the hook's name when unset.
    #[serde(rename = "type")]
    pub hook_type: Option<String>,
    /// Whether the hook fires.
    pub active: bool,
    /// Subscribed event names.
    pub events: Vec<String>,
    /// Hook configuration. Values for keys named in
    /// `password_config_keys` are secrets.
    pub config: BTreeMap<String, String>,
    /// Config keys the remote API redacts; excluded from equality.
    pub password_config_keys: BTreeSet<String>,
    /// Key inside the config data that uniquely identifies the hook
    /// when several hooks of one type coexist.
    pub config_key: Option<String>,
}

impl Default for HookSpec {
    fn default() -> Self {
        Self {
            hook_type: None,
            active: true,
            events: vec!["push".to_string()],
            config: BTreeMap::new(),
            password_config_keys: BTreeSet::new(),
            config_key: None,
        }
    }
}

/// A webhook in the desired-state graph, owned by a repository.
#[derive(Debug, Clone)]
pub struct RepositoryHook {
    /// Hook name, unique within its repository.
    pub name: String,
    hook_type: Option<String>,
    /// Whether the hook fires.
    pub active: bool,
    /// Subscribed event names. Order is irrelevant for comparison.
    pub events: Vec<String>,
    /// Hook configuration.
    pub config: BTreeMap<String, String>,
    /// Config keys excluded from equality comparison because the remote
    /// API redacts them.
    pub password_config_keys: BTreeSet<String>,
    /// Metadata only; convergence does not consult it.
    pub config_key: Option<String>,
}

impl RepositoryHook {
    pub(crate) fn new(name: &str, spec: HookSpec) -> Self {
        Self {
            name: name.to_string(),
            hook_type: spec.hook_type,
            active: spec.active,
            events: spec.events,
            config: spec.config,
            password_config_keys: spec.password_config_keys,
            config_key: spec.config_key,
        }
    }

    /// The hook type, defaulting to the hook's name.
    pub fn hook_type(&self) -> &str {
        self.hook_type.as_deref().unwrap_or(&self.name)
    }

    /// Whether only one instance of this hook type may exist.
    pub fn is_singleton(&self) -> bool {
        self.config_key.is_none()
    }

    /// Events sorted for order-insensitive comparison.
    pub fn sorted_events(&self) -> Vec<String> {
        let mut events = self.events.clone();
        events.sort();
        events
    }

    /// Whether a remote configuration matches this hook's.
    ///
    /// Keys named in `password_config_keys` always compare equal (the
    /// remote API redacts their values); every other key must match
    /// exactly, and the key counts must be equal.
    pub fn config_matches(&self, remote: &BTreeMap<String, String>) -> bool {
        if remote.len() != self.config.len() {
            return false;
        }
        remote.iter().all(|(key, value)| {
            self.password_config_keys.contains(key) || self.config.get(key) == Some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hook(spec: HookSpec) -> RepositoryHook {
        RepositoryHook::new("ci", spec)
    }

    fn config(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let hook = hook(HookSpec::default());
        assert!(hook.active);
        assert_eq!(hook.events, vec!["push"]);
        assert!(hook.config.is_empty());
        assert!(hook.is_singleton());
    }

    #[test]
    fn test_type_defaults_to_name() {
        let hook = hook(HookSpec::default());
        assert_eq!(hook.hook_type(), "ci");

        let hook = RepositoryHook::new(
            "ci",
            HookSpec {
                hook_type: Some("web".to_string()),
                ..HookSpec::default()
            },
        );
        assert_eq!(hook.hook_type(), "web");
    }

    #[test]
    fn test_config_key_disables_singleton() {
        let hook = hook(HookSpec {
            config_key: Some("url".to_string()),
            ..HookSpec::default()
        });
        assert!(!hook.is_singleton());
    }

    #[test]
    fn test_sorted_events() {
        let hook = hook(HookSpec {
            events: vec!["push".to_string(), "create".to_string()],
            ..HookSpec::default()
        });
        assert_eq!(hook.sorted_events(), vec!["create", "push"]);
    }

    #[test]
    fn test_config_matches_exact() {
        let hook = hook(HookSpec {
            config: config(&[("url", "https://a"), ("content_type", "json")]),
            ..HookSpec::default()
        });
        assert!(hook.config_matches(&config(&[("url", "https://a"), ("content_type", "json")])));
        assert!(!hook.config_matches(&config(&[("url", "https://b"), ("content_type", "json")])));
    }

    #[test]
    fn test_config_matches_ignores_password_keys_only() {
        let hook = hook(HookSpec {
            config: config(&[("url", "https://a"), ("token", "secret")]),
            password_config_keys: ["token".to_string()].into(),
            ..HookSpec::default()
        });
        // redacted token differs, still equal
        assert!(hook.config_matches(&config(&[("url", "https://a"), ("token", "********")])));
        // a non-password difference still forces an update
        assert!(!hook.config_matches(&config(&[("url", "https://b"), ("token", "********")])));
    }

    #[test]
    fn test_config_matches_requires_equal_key_counts() {
        let hook = hook(HookSpec {
            config: config(&[("url", "https://a"), ("token", "secret")]),
            password_config_keys: ["token".to_string()].into(),
            ..HookSpec::default()
        });
        // one key short, even though the only missing key is a password key
        assert!(!hook.config_matches(&config(&[("url", "https://a")])));
        // extra remote key
        assert!(!hook.config_matches(&config(&[
            ("url", "https://a"),
            ("token", "x"),
            ("insecure_ssl", "0")
        ])));
    }
}
