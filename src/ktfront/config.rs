//! Layered configuration for the ktfront front end.
//!
//! `defaults/ktfront.default.toml` is embedded into the crate so that the documented defaults
//! and runtime behavior stay in sync. Callers layer user files and single-key overrides on top
//! with [`Loader`] before deserializing into [`FrontendConfig`].

use crate::ktfront::grammar::{ConflictPolicy, FollowStrategy, GrammarOptions};
use crate::ktfront::parser::ParserOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/ktfront.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FrontendConfig {
    pub grammar: GrammarConfig,
    pub parser: ParserOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrammarConfig {
    /// Grammar file; the bundled grammar when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub conflict_policy: ConflictPolicy,
    pub follow_strategy: FollowStrategy,
}

impl GrammarConfig {
    pub fn options(&self) -> GrammarOptions {
        GrammarOptions {
            conflict_policy: self.conflict_policy,
            follow_strategy: self.follow_strategy,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

/// Builds a [`FrontendConfig`] from `defaults/ktfront.default.toml` plus whatever the CLI layers on top.
///
/// Files layer over the defaults in call order. Values from `set_override` sit above every file.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Seeded with the defaults compiled into the binary: bundled grammar, `Reject`, `FixedPoint`.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer the file named by `--config`. A missing file is a `ConfigError`, not a silent default.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Used for `--grammar`, which sets `grammar.path` above any file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<FrontendConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<FrontendConfig, ConfigError> {
    Loader::new().build()
}
