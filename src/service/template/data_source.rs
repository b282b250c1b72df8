use super::{mapper, TemplateState};
use crate::error::Error;
use sparkpost_client::TemplateClient;
use std::sync::Arc;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct TemplateQuery {
    pub id: String,
    #[serde(default)]
    pub draft: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct TemplateDataSource {
    client: Arc<dyn TemplateClient>,
}

impl TemplateDataSource {
    pub fn new(client: Arc<dyn TemplateClient>) -> Self {
        Self { client }
    }

    pub async fn read(&self, query: &TemplateQuery) -> Result<TemplateState, Error> {
        let draft = query.draft.unwrap_or(false);
        tracing::debug!("looking up template {:?} (draft: {})", query.id, draft);
        let template = self
            .client
            .get_template(&query.id, draft)
            .await
            .map_err(|err| {
                tracing::error!("unable to look up template {:?}: {}", query.id, err);
                Error::from(err)
            })?;
        let mut attributes = mapper::from_remote(&template)?;
        attributes.draft = draft;
        Ok(TemplateState {
            id: query.id.clone(),
            attributes,
        })
    }
}
