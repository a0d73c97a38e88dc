mod global;
mod workflow;
