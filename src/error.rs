use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteArtError>;

#[derive(Debug, Error)]
pub enum RouteArtError {
    /// The replay file has no line left to hand out.
    #[error("cannot read next line because end of file has been reached (file={}, line={line})", file.display())]
    DataExhausted { file: PathBuf, line: usize },

    /// Every frame in a socket read was empty.
    #[error("socket delivered no usable location frame (frames={frames:?})")]
    NoValidFrame { frames: Vec<String> },

    #[error("map request to {url} failed with status {status}: {body}")]
    RequestFailed {
        status: reqwest::StatusCode,
        url: String,
        body: String,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{0} has no associated image file path")]
    MissingPath(&'static str),

    #[error("malformed location payload {raw:?}: {reason}")]
    MalformedFix { raw: String, reason: String },

    #[error("session reference center is already set; reset the session first")]
    CenterAlreadySet,

    #[error("session has no reference center")]
    MissingCenter,

    #[error("environment variable {key} {reason}")]
    Config { key: &'static str, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl RouteArtError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Config {
            key,
            reason: reason.into(),
        }
    }
}
