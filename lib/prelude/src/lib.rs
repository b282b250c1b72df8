mod from;

pub use from::{FromAddress, FromValue, ParseFromError};

use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Always serialized: the update endpoint lets a `published` field in the
    /// body override its `update_published` query parameter.
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TemplateOptions>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(default, skip_serializing_if = "FromValue::is_empty")]
    pub from: FromValue,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reply_to: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email_rfc822: String,
}

/// Each flag is optional: an absent value leaves the remote setting untouched
/// on update.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TemplateOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_tracking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_tracking: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactional: Option<bool>,
}

/// Envelope wrapping every successful response of the API.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct Results<T> {
    pub results: T,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct CreatedTemplate {
    pub id: String,
}

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct PublishRequest {
    pub published: bool,
}

impl Default for PublishRequest {
    fn default() -> Self {
        Self { published: true }
    }
}

/// Envelope of a failed response.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ApiErrors {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref code) = self.code {
            write!(f, " (code {code})")?;
        }
        if let Some(ref description) = self.description {
            write!(f, ": {description}")?;
        }
        Ok(())
    }
}
