//! Capability gating for host functions.
//!
//! A host grants a script's environment a set of capabilities up front;
//! the bridge checks them before touching the operating system. Console
//! output is always allowed — process execution is not.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A capability the host can grant to a script environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Spawn external processes (`lunos.shell`).
    Process,
    /// Capability namespace extension point for embedders.
    Custom(String),
}

impl Capability {
    /// Parse a capability from its string form.
    pub fn parse(s: &str) -> Self {
        match s {
            "process" => Capability::Process,
            other => Capability::Custom(other.to_string()),
        }
    }

    /// String form of the capability.
    pub fn as_str(&self) -> &str {
        match self {
            Capability::Process => "process",
            Capability::Custom(s) => s,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of capabilities granted to one script environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    capabilities: HashSet<Capability>,
}

impl CapabilitySet {
    /// An empty set: console only, no OS access.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from capability strings.
    pub fn from_strings<I, S>(strings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let capabilities = strings
            .into_iter()
            .map(|s| Capability::parse(s.as_ref()))
            .collect();
        Self { capabilities }
    }

    /// Grant one capability.
    pub fn add(&mut self, cap: Capability) {
        self.capabilities.insert(cap);
    }

    /// Whether a capability has been granted.
    pub fn has(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Whether every capability in `other` is granted here.
    pub fn contains_all(&self, other: &CapabilitySet) -> bool {
        other.capabilities.is_subset(&self.capabilities)
    }

    /// Iterate the granted capabilities.
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }

    /// Number of granted capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether nothing has been granted.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(Capability::parse("process"), Capability::Process);
        assert_eq!(Capability::Process.as_str(), "process");
        let custom = Capability::parse("clipboard");
        assert_eq!(custom, Capability::Custom("clipboard".to_string()));
        assert_eq!(custom.as_str(), "clipboard");
    }

    #[test]
    fn test_set_membership() {
        let caps = CapabilitySet::from_strings(["process"]);
        assert!(caps.has(&Capability::Process));
        assert!(!caps.has(&Capability::Custom("net".to_string())));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn test_contains_all() {
        let granted = CapabilitySet::from_strings(["process", "clipboard"]);
        let wanted = CapabilitySet::from_strings(["process"]);
        assert!(granted.contains_all(&wanted));
        assert!(!wanted.contains_all(&granted));
        assert!(granted.contains_all(&CapabilitySet::new()));
    }
}
