//! Error types for wpblocks

use std::path::PathBuf;

/// Result type for wpblocks operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the I/O layer around the formatter. Conversion itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("WordPress username and application password must be set")]
    MissingCredentials,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WordPress returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error(
        "No post id for {}: set `id` or `slug`, or add a slug to its front matter",
        file.display()
    )]
    UnresolvedPost { file: PathBuf },

    #[error("No post found with slug {slug:?}")]
    SlugNotFound { slug: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
