use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an interaction produced no change. None of these are faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingTarget,
    RedundantAction,
    Busy,
    PageInactive,
    BelowThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Skipped(SkipReason),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Outcome::Applied(_) => None,
            Outcome::Skipped(reason) => Some(*reason),
        }
    }
}

/// Configuration and mount failures. Runtime interactions never produce one.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("product catalog must contain at least one product")]
    EmptyCatalog,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SiteError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
