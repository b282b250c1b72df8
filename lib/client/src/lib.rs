pub mod http;

pub use sparkpost_prelude::{ApiError, Template};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("template {0:?} not found")]
    NotFound(String),
    #[error("sparkpost responded with {status}: {}", join_messages(.errors))]
    Api {
        status: reqwest::StatusCode,
        errors: Vec<ApiError>,
    },
    #[error("unable to execute request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid base url {0:?}")]
    InvalidBaseUrl(String),
    #[error("api key is not a valid header value")]
    InvalidApiKey,
}

fn join_messages(errors: &[ApiError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Operations on the templates of a SparkPost account.
#[async_trait::async_trait]
pub trait TemplateClient: std::fmt::Debug + Send + Sync {
    /// Fetches the draft or the published copy of a template.
    async fn get_template(&self, id: &str, draft: bool) -> Result<Template, Error>;
    /// Creates a template and returns its id, generated by the service when
    /// the template id is empty.
    async fn create_template(&self, template: &Template) -> Result<String, Error>;
    /// Writes the draft, or the published copy when `update_published` is set.
    async fn update_template(&self, template: &Template, update_published: bool)
        -> Result<(), Error>;
    async fn publish_template(&self, id: &str) -> Result<(), Error>;
    async fn delete_template(&self, id: &str) -> Result<(), Error>;
}
