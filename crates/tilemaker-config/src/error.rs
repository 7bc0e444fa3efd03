//! Errors raised while loading or storing `config.ron`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid RON for [`crate::Config`].
    #[error("{} is malformed: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("cannot serialize settings: {0}")]
    Serialize(#[source] ron::Error),

    /// A setting holds a value the builder cannot use.
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
