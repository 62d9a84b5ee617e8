//! Control flags for nodes in an authorization stack.

use crate::core::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a node's verdict combines with its siblings.
///
/// The adapter never interprets the flag; it is carried for the stack
/// evaluator and shows up in log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthControlFlag {
    /// Must succeed; evaluation continues either way
    Required,
    /// Must succeed; a failure stops evaluation
    Requisite,
    /// Success is enough on its own
    Sufficient,
    /// Verdict only matters if nothing else decides
    Optional,
}

impl AuthControlFlag {
    /// Lowercase identifier as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthControlFlag::Required => "required",
            AuthControlFlag::Requisite => "requisite",
            AuthControlFlag::Sufficient => "sufficient",
            AuthControlFlag::Optional => "optional",
        }
    }
}

impl std::fmt::Display for AuthControlFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthControlFlag::Required => write!(f, "REQUIRED"),
            AuthControlFlag::Requisite => write!(f, "REQUISITE"),
            AuthControlFlag::Sufficient => write!(f, "SUFFICIENT"),
            AuthControlFlag::Optional => write!(f, "OPTIONAL"),
        }
    }
}

impl FromStr for AuthControlFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(AuthControlFlag::Required),
            "requisite" => Ok(AuthControlFlag::Requisite),
            "sufficient" => Ok(AuthControlFlag::Sufficient),
            "optional" => Ok(AuthControlFlag::Optional),
            _ => Err(Error::UnknownControlFlag(s.to_string())),
        }
    }
}
