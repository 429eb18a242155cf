//! `[run]`: test discovery and execution settings.

use cdt_core::FailurePolicy;
use serde::{Deserialize, Serialize};

fn default_header_ext() -> String {
    "h".to_string()
}

fn default_marker() -> String {
    ">>>".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    /// Extension of the header paired with a module (`fac` -> `fac.h`).
    #[serde(default = "default_header_ext")]
    pub header_ext: String,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Prefix of statement lines in doctest comments.
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            header_ext: default_header_ext(),
            failure_policy: FailurePolicy::default(),
            marker: default_marker(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = RunConfig::default();
        assert_eq!(config.header_ext, "h");
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert_eq!(config.marker, ">>>");
    }
}
