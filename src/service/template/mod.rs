pub mod data_source;
pub mod mapper;
pub mod resource;
pub mod schema;

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

pub const TYPE_NAME: &str = "sparkpost_template";

/// Hosts send `null` for unset attributes, which stands for the default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Attributes of a `sparkpost_template`, as configured by the operator.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TemplateAttributes {
    /// Id requested on creation, generated by SparkPost when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Which copy to read. Kept locally, never sent to SparkPost.
    #[serde(default, deserialize_with = "null_as_default")]
    pub draft: bool,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    pub content_subject: String,
    pub content_from_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_reply_to: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_email_rfc822: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options_open_tracking: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options_click_tracking: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options_transactional: bool,
}

impl TemplateAttributes {
    /// Decodes the attribute bag sent by the host, failing on missing
    /// required attributes.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Attributes stored by the host once the template exists.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TemplateState {
    pub id: String,
    #[serde(flatten)]
    pub attributes: TemplateAttributes,
}

impl TemplateState {
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// The few attributes of a prior state needed to drive an operation. Missing
/// and null attributes are allowed since prior states can be partial, after an
/// import for example.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct PriorHints {
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub draft: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
}

impl PriorHints {
    /// Fails on wrongly typed attributes, an absent prior state gives the
    /// defaults.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::deserialize(value)
    }
}
