//! Proptest strategies

use proptest::prelude::*;

/// Priorities that violate the `>= 1` invariant
pub fn invalid_priority_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![Just(0i64), Just(i64::MIN), i64::MIN..1]
}

pub fn valid_priority_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000
}

/// Task names drawn from a small alphabet so collisions happen
pub fn task_name_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,3}"
}
