use crate::{Error, TemplateClient};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use sparkpost_prelude::{ApiError, ApiErrors, CreatedTemplate, PublishRequest, Results, Template};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.sparkpost.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }

    fn parse_base_url(&self) -> Result<Url, Error> {
        let url = Url::parse(&self.base_url).map_err(|err| {
            tracing::error!("unable to parse base url {:?}: {:?}", self.base_url, err);
            Error::InvalidBaseUrl(self.base_url.clone())
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            tracing::error!("unsupported base url {:?}", self.base_url);
            return Err(Error::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(url)
    }

    fn default_headers(&self) -> Result<HeaderMap, Error> {
        let mut value =
            HeaderValue::from_str(&self.api_key).map_err(|_| Error::InvalidApiKey)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    pub fn build(&self) -> Result<HttpClient, Error> {
        tracing::debug!("building sparkpost client for {}", self.base_url);
        let base_url = self.parse_base_url()?;
        let client = reqwest::Client::builder()
            .default_headers(self.default_headers()?)
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()?;
        Ok(HttpClient { client, base_url })
    }
}

/// Used when the caller doesn't identify itself.
pub fn default_user_agent() -> String {
    format!("sparkpost-client/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    fn templates_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        // the base url has been checked to be a valid base when building
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "v1", "templates"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn send(
        &self,
        id: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Error> {
        let res = request.send().await.map_err(|err| {
            tracing::error!("unable to execute request for template {:?}: {:?}", id, err);
            Error::Request(err)
        })?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("template {:?} not found", id);
            return Err(Error::NotFound(id.to_string()));
        }
        let body = res.text().await.unwrap_or_default();
        let errors = match serde_json::from_str::<ApiErrors>(&body) {
            Ok(ApiErrors { errors }) if !errors.is_empty() => errors,
            _ => vec![ApiError {
                message: body,
                code: None,
                description: None,
            }],
        };
        tracing::error!("sparkpost responded with {} for template {:?}", status, id);
        Err(Error::Api { status, errors })
    }
}

#[async_trait::async_trait]
impl TemplateClient for HttpClient {
    async fn get_template(&self, id: &str, draft: bool) -> Result<Template, Error> {
        tracing::debug!("fetching template {:?} (draft: {})", id, draft);
        let request = self
            .client
            .get(self.templates_url(Some(id)))
            .query(&[("draft", draft)]);
        let res = self.send(id, request).await?;
        let payload: Results<Template> = res.json().await.map_err(|err| {
            tracing::error!("unable to parse template {:?}: {:?}", id, err);
            Error::Request(err)
        })?;
        Ok(payload.results)
    }

    async fn create_template(&self, template: &Template) -> Result<String, Error> {
        tracing::debug!("creating template {:?}", template.id);
        let request = self.client.post(self.templates_url(None)).json(template);
        let res = self.send(&template.id, request).await?;
        let payload: Results<CreatedTemplate> = res.json().await.map_err(|err| {
            tracing::error!("unable to parse created template: {:?}", err);
            Error::Request(err)
        })?;
        Ok(payload.results.id)
    }

    async fn update_template(
        &self,
        template: &Template,
        update_published: bool,
    ) -> Result<(), Error> {
        tracing::debug!(
            "updating template {:?} (update published: {})",
            template.id,
            update_published
        );
        let request = self
            .client
            .put(self.templates_url(Some(&template.id)))
            .query(&[("update_published", update_published)])
            .json(template);
        self.send(&template.id, request).await?;
        Ok(())
    }

    async fn publish_template(&self, id: &str) -> Result<(), Error> {
        tracing::debug!("publishing template {:?}", id);
        let request = self
            .client
            .put(self.templates_url(Some(id)))
            .json(&PublishRequest::default());
        self.send(id, request).await?;
        Ok(())
    }

    async fn delete_template(&self, id: &str) -> Result<(), Error> {
        tracing::debug!("deleting template {:?}", id);
        let request = self.client.delete(self.templates_url(Some(id)));
        self.send(id, request).await?;
        Ok(())
    }
}
