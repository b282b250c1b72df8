use crate::error::{Diagnostic, Error};
use crate::service::configuration::Configuration;
use crate::service::schema::ProviderSchema;
use crate::service::template::data_source::{TemplateDataSource, TemplateQuery};
use crate::service::template::resource::TemplateResource;
use crate::service::template::{self, PriorHints, TemplateAttributes, TemplateState};
use serde_json::Value as JsonValue;
use sparkpost_client::TemplateClient;
use std::sync::Arc;

pub struct Provider;

impl Provider {
    pub fn schema() -> ProviderSchema {
        ProviderSchema::new(Configuration::schema())
            .with_resource(template::TYPE_NAME, template::schema::resource())
            .with_data_source(template::TYPE_NAME, template::schema::data_source())
    }

    /// Builds the client shared by every operation. Fails before any operation
    /// runs when the credentials are missing or invalid.
    pub fn configure(configuration: &Configuration) -> Result<ConfiguredProvider, Error> {
        let client = configuration.build()?;
        Ok(ConfiguredProvider::new(Arc::new(client)))
    }
}

/// Operation requested by the host on a resource or a data source.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    Plan {
        type_name: String,
        #[serde(default)]
        prior_state: JsonValue,
        planned_state: JsonValue,
    },
    Create {
        type_name: String,
        planned_state: JsonValue,
    },
    Read {
        type_name: String,
        id: String,
        #[serde(default)]
        prior_state: JsonValue,
    },
    Update {
        type_name: String,
        id: String,
        prior_state: JsonValue,
        planned_state: JsonValue,
    },
    Delete {
        type_name: String,
        id: String,
    },
    Import {
        type_name: String,
        id: String,
    },
    ReadDataSource {
        type_name: String,
        config: JsonValue,
    },
}

/// A missing `id` tells the host the resource doesn't exist (anymore).
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<String>,
    /// Changed attributes forcing the host to destroy and recreate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn from_state(state: TemplateState) -> Result<Self, Error> {
        Ok(Self {
            state: Some(state.to_value()?),
            id: Some(state.id),
            ..Default::default()
        })
    }

    fn failure(err: &Error) -> Self {
        Self {
            diagnostics: vec![Diagnostic::from(err)],
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|item| item.severity == crate::error::Severity::Error)
    }
}

fn check_type(kind: &'static str, name: &str) -> Result<(), Error> {
    if name == template::TYPE_NAME {
        Ok(())
    } else {
        Err(Error::UnsupportedType {
            kind,
            name: name.to_string(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ConfiguredProvider {
    template: TemplateResource,
    template_source: TemplateDataSource,
}

impl ConfiguredProvider {
    pub fn new(client: Arc<dyn TemplateClient>) -> Self {
        Self {
            template: TemplateResource::new(client.clone()),
            template_source: TemplateDataSource::new(client),
        }
    }

    pub async fn handle(&self, request: Request) -> Response {
        match self.execute(request).await {
            Ok(found) => found,
            Err(err) => {
                tracing::error!("operation failed: {}", err);
                Response::failure(&err)
            }
        }
    }

    async fn execute(&self, request: Request) -> Result<Response, Error> {
        match request {
            Request::Plan {
                type_name,
                prior_state,
                planned_state,
            } => {
                check_type("resource", &type_name)?;
                let schema = template::schema::resource();
                let changed = schema
                    .changed_attributes(&prior_state, &planned_state)
                    .into_iter()
                    .map(String::from)
                    .collect();
                let replace = schema
                    .replaced_attributes(&prior_state, &planned_state)
                    .into_iter()
                    .map(String::from)
                    .collect();
                Ok(Response {
                    changed,
                    replace,
                    ..Default::default()
                })
            }
            Request::Create {
                type_name,
                planned_state,
            } => {
                check_type("resource", &type_name)?;
                let desired = TemplateAttributes::from_value(planned_state)?;
                Response::from_state(self.template.create(&desired).await?)
            }
            Request::Read {
                type_name,
                id,
                prior_state,
            } => {
                check_type("resource", &type_name)?;
                let hints = PriorHints::from_value(&prior_state)?;
                match self.template.read(&id, hints.draft).await? {
                    Some(mut state) => {
                        state.attributes.template_id = hints.template_id;
                        Response::from_state(state)
                    }
                    None => Ok(Response {
                        diagnostics: vec![Diagnostic::warning(
                            "Template not found",
                            format!("template {id:?} no longer exists, removing it from state"),
                        )],
                        ..Default::default()
                    }),
                }
            }
            Request::Update {
                type_name,
                id,
                prior_state,
                planned_state,
            } => {
                check_type("resource", &type_name)?;
                let hints = PriorHints::from_value(&prior_state)?;
                let desired = TemplateAttributes::from_value(planned_state)?;
                Response::from_state(self.template.update(&id, hints.published, &desired).await?)
            }
            Request::Delete { type_name, id } => {
                check_type("resource", &type_name)?;
                self.template.delete(&id).await?;
                Ok(Response::default())
            }
            Request::Import { type_name, id } => {
                check_type("resource", &type_name)?;
                Response::from_state(self.template.import(&id).await?)
            }
            Request::ReadDataSource { type_name, config } => {
                check_type("data source", &type_name)?;
                let query: TemplateQuery = serde_json::from_value(config)?;
                Response::from_state(self.template_source.read(&query).await?)
            }
        }
    }
}
