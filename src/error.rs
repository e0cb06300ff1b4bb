//! Error taxonomy for a generation run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed declaration text or documentation that does not match it.
    #[error("cannot parse `{text}`: {reason}")]
    Parse { text: String, reason: String },

    /// A native API shape the binding generator cannot translate.
    #[error("cannot scaffold `{function}`: {reason}")]
    Classify { function: String, reason: String },

    #[error("invalid configuration in {origin}: {reason}")]
    Config { origin: String, reason: String },

    #[error("template `{name}`: {reason}")]
    Template { name: String, reason: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read YAML from {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parse {
            text: text.into(),
            reason: reason.into(),
        }
    }

    pub fn classify(function: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Classify {
            function: function.into(),
            reason: reason.into(),
        }
    }

    pub fn config(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Config {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub fn template(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Template {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Parse errors only abort the offending header; everything else aborts the run.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}
