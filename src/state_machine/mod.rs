// State machine module for the node lifecycle
//
// A closed enum carries transition legality and the can-process predicate; the
// machine itself owns only the current state and derives the next one from facts
// supplied by its node.

pub mod errors;
pub mod machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use machine::{NodeFacts, StateMachine};
pub use states::NodeState;
