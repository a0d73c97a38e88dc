//! # Node Registry
//!
//! Process-wide directory of live nodes, keyed by node id. Nodes register
//! themselves on construction when built with a registry and use it to resolve
//! their dependencies.
//!
//! The registry is constructed explicitly and shared by `Arc`; nodes keep only a
//! `Weak` handle back to it, so dropping the last owner tears everything down.

pub mod node_registry;

pub use node_registry::NodeRegistry;
