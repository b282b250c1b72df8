//! Declarative description of the attributes the host manages for the
//! provider, its resources and its data sources.

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    /// Unordered map with string keys and string values.
    StringMap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Required,
    Optional,
    /// Only set by the provider.
    Computed,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub mode: Mode,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    /// A change of this attribute alone never requires an update.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub diff_suppressed: bool,
    /// A change of this attribute destroys and recreates the resource.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub force_new: bool,
}

impl Attribute {
    fn new(kind: AttributeType, mode: Mode, description: &'static str) -> Self {
        Self {
            kind,
            mode,
            description,
            default: None,
            env: None,
            sensitive: false,
            diff_suppressed: false,
            force_new: false,
        }
    }

    pub fn required(kind: AttributeType, description: &'static str) -> Self {
        Self::new(kind, Mode::Required, description)
    }

    pub fn optional(kind: AttributeType, description: &'static str) -> Self {
        Self::new(kind, Mode::Optional, description)
    }

    pub fn computed(kind: AttributeType, description: &'static str) -> Self {
        Self::new(kind, Mode::Computed, description)
    }

    pub fn with_default(mut self, value: impl Into<JsonValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_env(mut self, name: &'static str) -> Self {
        self.env = Some(name);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn diff_suppressed(mut self) -> Self {
        self.diff_suppressed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    fn value_in<'a>(&'a self, state: &'a JsonValue, name: &str) -> &'a JsonValue {
        match state.get(name) {
            Some(JsonValue::Null) | None => self.default.as_ref().unwrap_or(&JsonValue::Null),
            Some(value) => value,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.mode == Mode::Required)
            .map(|(name, _)| *name)
    }

    /// Lists the attributes the host should send an update for, between the
    /// state it holds and the planned one. Missing and null values fall back
    /// to the attribute default.
    pub fn changed_attributes(&self, prior: &JsonValue, planned: &JsonValue) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|(_, attr)| attr.mode != Mode::Computed && !attr.diff_suppressed)
            .filter(|(name, attr)| attr.value_in(prior, name) != attr.value_in(planned, name))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Subset of the changed attributes that can't be updated in place.
    pub fn replaced_attributes(
        &self,
        prior: &JsonValue,
        planned: &JsonValue,
    ) -> Vec<&'static str> {
        self.changed_attributes(prior, planned)
            .into_iter()
            .filter(|name| self.get(name).is_some_and(|attr| attr.force_new))
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<&'static str, Schema>,
    pub data_sources: BTreeMap<&'static str, Schema>,
}

impl ProviderSchema {
    pub fn new(provider: Schema) -> Self {
        Self {
            provider,
            ..Default::default()
        }
    }

    pub fn with_resource(mut self, name: &'static str, schema: Schema) -> Self {
        self.resources.insert(name, schema);
        self
    }

    pub fn with_data_source(mut self, name: &'static str, schema: Schema) -> Self {
        self.data_sources.insert(name, schema);
        self
    }
}
