// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors reported by the price-path inference engine.
///
/// A refuted scenario is not an error: a pattern whose envelope rejects an
/// observation is silently dropped from the mixture. Errors cover malformed
/// caller input and floating-point breakdown only.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ForecastError {
    /// Caller-supplied data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A computation produced a non-finite or otherwise unusable value.
    #[error("numerical issue: {0}")]
    NumericalIssue(String),
}

impl ForecastError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn numerical_issue(message: impl Into<String>) -> Self {
        Self::NumericalIssue(message.into())
    }
}
