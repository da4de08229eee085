// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Validation failures raised by the aggregation engine.
///
/// Each one is scoped to a single evaluation call; nothing here is transient,
/// so callers surface them to the user instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid savings goal: {0}")]
    InvalidGoal(String),

    #[error("Unknown period '{0}', expected daily|weekly|monthly|quarterly|yearly")]
    InvalidPeriod(String),

    #[error("Amount out of range while computing {0}")]
    Overflow(&'static str),

    #[error("Invalid {kind} '{value}'")]
    InvalidValue { kind: &'static str, value: String },
}

impl EngineError {
    pub(crate) fn invalid_value(kind: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            kind,
            value: value.to_string(),
        }
    }
}
