use crate::error::ConfigurationError;
use crate::service::schema::{Attribute, AttributeType, Schema};
use sparkpost_client::http::{self, HttpClient};
use std::time::Duration;

pub const ENV_PREFIX: &str = "SPARKPOST";
pub const ENV_API_KEY: &str = "SPARKPOST_API_KEY";
pub const ENV_BASE_URL: &str = "SPARKPOST_BASE_URL";

/// Product token sent with every request.
pub const USER_AGENT: &str = concat!("sparkpost-provider/", env!("CARGO_PKG_VERSION"));

/// Values explicitly set in the provider block by the operator.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ProviderBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "Configuration::default_base_url")]
    pub base_url: String,
    /// Request timeout, in milliseconds.
    #[serde(default = "Configuration::default_timeout")]
    pub timeout: u64,
    /// Product token of the host, prepended to the user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Configuration {
    fn default_base_url() -> String {
        http::DEFAULT_BASE_URL.to_string()
    }

    fn default_timeout() -> u64 {
        http::DEFAULT_TIMEOUT.as_millis() as u64
    }

    pub fn schema() -> Schema {
        Schema::default()
            .with_attribute(
                "api_key",
                Attribute::optional(AttributeType::String, "The API key for the SparkPost account.")
                    .with_env(ENV_API_KEY)
                    .sensitive(),
            )
            .with_attribute(
                "base_url",
                Attribute::optional(
                    AttributeType::String,
                    "The base URL for the SparkPost account.",
                )
                .with_env(ENV_BASE_URL)
                .with_default(http::DEFAULT_BASE_URL),
            )
    }

    /// Explicit values win over the environment, which wins over the optional
    /// configuration file.
    pub fn load(block: &ProviderBlock, path: Option<&str>) -> Result<Self, ConfigurationError> {
        Self::load_with_env(block, path, None)
    }

    pub(crate) fn load_with_env(
        block: &ProviderBlock,
        path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigurationError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let configuration = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).source(env))
            .set_override_option("api_key", block.api_key.clone())?
            .set_override_option("base_url", block.base_url.clone())?
            .build()?
            .try_deserialize()?;
        Ok(configuration)
    }

    fn user_agent(&self) -> String {
        match self.user_agent {
            Some(ref product) if !product.is_empty() => format!("{product} {USER_AGENT}"),
            _ => USER_AGENT.to_string(),
        }
    }

    pub fn build(&self) -> Result<HttpClient, ConfigurationError> {
        tracing::debug!("building sparkpost client");
        if self.api_key.trim().is_empty() {
            tracing::error!("no api key provided");
            return Err(ConfigurationError::Missing("api_key"));
        }
        http::Config {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_millis(self.timeout),
            user_agent: self.user_agent(),
        }
        .build()
        .map_err(ConfigurationError::Client)
    }
}
