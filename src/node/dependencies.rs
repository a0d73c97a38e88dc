//! # Dependency Resolution
//!
//! A dependency is resolved when the referenced node is found in the registry, its
//! status is the idle sentinel, and its state machine is Ready. This is the single
//! resolution predicate; explicit acknowledgment (`Node::resolve_dependency`)
//! retires an entry from the list instead of flipping a flag.

use crate::registry::NodeRegistry;
use crate::types::NodeId;

/// Outcome of resolving one dependency reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Resolved,
    /// Present in the registry but not idle and Ready
    Pending,
    /// Absent from the registry (or no registry is attached)
    Missing,
}

/// Resolve a single dependency through the registry
pub fn resolve(registry: Option<&NodeRegistry>, dependency: &NodeId) -> Resolution {
    match registry.and_then(|registry| registry.lookup(dependency.as_str())) {
        Some(node) if node.is_idle() => Resolution::Resolved,
        Some(_) => Resolution::Pending,
        None => Resolution::Missing,
    }
}

/// Snapshot of a node's dependency list checked against the registry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyScan {
    /// Every dependency that did not resolve, in list order
    pub unresolved: Vec<NodeId>,
    /// The subset of `unresolved` that was absent from the registry
    pub missing: Vec<NodeId>,
}

impl DependencyScan {
    /// Check each dependency in order
    ///
    /// Callers must not hold the dependent node's lock: a dependency may refer back
    /// to the dependent itself.
    pub fn run(dependencies: &[NodeId], registry: Option<&NodeRegistry>) -> Self {
        let mut scan = Self::default();
        for dependency in dependencies {
            match resolve(registry, dependency) {
                Resolution::Resolved => {}
                Resolution::Pending => scan.unresolved.push(dependency.clone()),
                Resolution::Missing => {
                    scan.unresolved.push(dependency.clone());
                    scan.missing.push(dependency.clone());
                }
            }
        }
        scan
    }

    pub fn is_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}
