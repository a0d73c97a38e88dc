//! # Messaging
//!
//! Data contracts for task, status and dependency exchanges.

pub mod message;

pub use message::{MessagePayload, NodeMessage};
