//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed working directories and env vars.

use cdt_config::{CdtConfig, ConfigError};
use cdt_core::{FailurePolicy, ScopePolicy};
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[repl]
binary = "/opt/llvm/bin/clang-repl"
args = ["--Xcc=-std=c++20"]
prompt = "repl> "
statement_timeout_secs = 5

[run]
header_ext = "hpp"
failure_policy = "abort_case"
marker = "$"

[parse]
scope_policy = "qualified"
tolerate_errors = true
default_filename = "fac.cc"
"#,
        )?;

        let config: CdtConfig = Figment::from(Serialized::defaults(CdtConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.repl.binary, "/opt/llvm/bin/clang-repl");
        assert_eq!(config.repl.args, vec!["--Xcc=-std=c++20"]);
        assert_eq!(config.repl.prompt, "repl> ");
        assert_eq!(config.repl.statement_timeout_secs, 5);
        assert_eq!(config.run.header_ext, "hpp");
        assert_eq!(config.run.failure_policy, FailurePolicy::AbortCase);
        assert_eq!(config.run.marker, "$");
        assert_eq!(config.parse.scope_policy, ScopePolicy::Qualified);
        assert!(config.parse.tolerate_errors);
        assert_eq!(config.parse.default_filename, "fac.cc");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_other_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[run]\nheader_ext = \"hh\"\n")?;

        let config: CdtConfig = Figment::from(Serialized::defaults(CdtConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.run.header_ext, "hh");
        assert_eq!(config.run.marker, ">>>");
        assert_eq!(config.repl, CdtConfig::default().repl);
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up_from_working_directory() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cdoctest")?;
        jail.create_file(
            ".cdoctest/config.toml",
            "[parse]\nscope_policy = \"qualified\"\n",
        )?;

        let config = CdtConfig::load().expect("config loads");
        assert_eq!(config.parse.scope_policy, ScopePolicy::Qualified);
        Ok(())
    });
}

#[test]
fn unknown_policy_name_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cdoctest")?;
        jail.create_file(
            ".cdoctest/config.toml",
            "[run]\nfailure_policy = \"retry\"\n",
        )?;

        assert!(matches!(CdtConfig::load(), Err(ConfigError::Figment(_))));
        Ok(())
    });
}

#[test]
fn invalid_value_fails_validation_on_load() {
    Jail::expect_with(|jail| {
        jail.create_dir(".cdoctest")?;
        jail.create_file(
            ".cdoctest/config.toml",
            "[repl]\nstatement_timeout_secs = 0\n",
        )?;

        assert!(matches!(
            CdtConfig::load(),
            Err(ConfigError::InvalidValue { .. })
        ));
        Ok(())
    });
}
