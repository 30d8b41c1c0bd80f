//! Pipeline policy configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the pipeline does when a single match cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the whole batch on the first failing match
    #[default]
    FailFast,
    /// Log and skip failing matches whose record is flagged best-effort.
    /// Failures on other records still abort.
    SkipBestEffort,
}

/// Whether the registry may create players on first appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationPolicy {
    #[default]
    Lazy,
    /// Only players registered before the run may appear in matches
    RegisteredOnly,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPolicy::FailFast => write!(f, "fail_fast"),
            ErrorPolicy::SkipBestEffort => write!(f, "skip_best_effort"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail_fast" => Ok(ErrorPolicy::FailFast),
            "skip_best_effort" => Ok(ErrorPolicy::SkipBestEffort),
            other => Err(format!("unknown error policy: {}", other)),
        }
    }
}

impl fmt::Display for CreationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreationPolicy::Lazy => write!(f, "lazy"),
            CreationPolicy::RegisteredOnly => write!(f, "registered_only"),
        }
    }
}

impl FromStr for CreationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lazy" => Ok(CreationPolicy::Lazy),
            "registered_only" => Ok(CreationPolicy::RegisteredOnly),
            other => Err(format!("unknown creation policy: {}", other)),
        }
    }
}

/// Policies applied while folding the match ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub error_policy: ErrorPolicy,
    pub creation_policy: CreationPolicy,
}
