//! Error type returned by the CLI pipeline.

use std::{io, ops::Range, path::PathBuf};

use thiserror::Error;

use orthogram::OrthogramError;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid state graph {path}: {message}")]
    Input {
        path: String,
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error(transparent)]
    Orthogram(#[from] OrthogramError),

    #[error("Failed to serialize layout: {0}")]
    Output(String),
}

impl CliError {
    /// Wraps a TOML error raised while reading the input graph.
    pub fn input(path: &str, src: String, err: &toml::de::Error) -> Self {
        Self::Input {
            path: path.to_string(),
            message: err.message().to_string(),
            span: err.span(),
            src,
        }
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}
