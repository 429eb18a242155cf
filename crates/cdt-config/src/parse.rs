//! `[parse]`: comment attachment settings.

use cdt_core::ScopePolicy;
use serde::{Deserialize, Serialize};

fn default_filename() -> String {
    "sample.cpp".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParseConfig {
    #[serde(default)]
    pub scope_policy: ScopePolicy,

    /// Attach comments even when the source has syntax errors.
    #[serde(default)]
    pub tolerate_errors: bool,

    /// Path prefix for sources given without a file name.
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            scope_policy: ScopePolicy::default(),
            tolerate_errors: false,
            default_filename: default_filename(),
        }
    }
}
