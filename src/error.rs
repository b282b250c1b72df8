use sparkpost_prelude::ParseFromError;
use std::borrow::Cow;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("missing value for {0}")]
    Missing(&'static str),
    #[error("unable to load configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("unable to initialize sparkpost client: {0}")]
    Client(#[source] sparkpost_client::Error),
    #[error("malformed from address: {0}")]
    From(#[from] ParseFromError),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("invalid attributes: {0}")]
    InvalidAttributes(#[from] serde_json::Error),
    #[error("template {0:?} not found")]
    NotFound(String),
    #[error(transparent)]
    Remote(sparkpost_client::Error),
    #[error("unsupported {kind} type {name:?}")]
    UnsupportedType { kind: &'static str, name: String },
    #[error("{name} can't change from {current:?} to {requested:?} without replacing the template")]
    Immutable {
        name: &'static str,
        current: String,
        requested: String,
    },
}

impl From<sparkpost_client::Error> for Error {
    fn from(err: sparkpost_client::Error) -> Self {
        match err {
            sparkpost_client::Error::NotFound(id) => Self::NotFound(id),
            other => Self::Remote(other),
        }
    }
}

impl From<ParseFromError> for Error {
    fn from(err: ParseFromError) -> Self {
        Self::Configuration(ConfigurationError::From(err))
    }
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What the host shows to the operator when an operation fails.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: Cow<'static, str>,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<Cow<'static, str>>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<Cow<'static, str>>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        let summary = match err {
            Error::Configuration(ConfigurationError::From(_)) => "Unable to map template sender",
            Error::Configuration(_) => "Unable to initialize SparkPost client",
            Error::InvalidAttributes(_) => "Invalid template attributes",
            Error::NotFound(_) => "Template not found",
            Error::Remote(_) => "SparkPost request failed",
            Error::UnsupportedType { .. } => "Unsupported type",
            Error::Immutable { .. } => "Attribute requires replacement",
        };
        Self::error(summary, err.to_string())
    }
}
