use async_trait::async_trait;
use sparkpost_client::{ApiError, Error, TemplateClient};
use sparkpost_prelude::Template;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Get { id: String, draft: bool },
    Create { template: Template },
    Update { template: Template, update_published: bool },
    Publish { id: String },
    Delete { id: String },
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<Call>,
    drafts: HashMap<String, Template>,
    published: HashMap<String, Template>,
    generated: usize,
    failing: Option<&'static str>,
}

/// In memory account recording every call it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeClient {
    state: Mutex<FakeState>,
}

fn api_error(message: &str) -> Error {
    Error::Api {
        status: reqwest::StatusCode::UNPROCESSABLE_ENTITY,
        errors: vec![ApiError {
            message: message.to_string(),
            code: None,
            description: None,
        }],
    }
}

impl FakeClient {
    pub(crate) fn with_draft(self, template: Template) -> Self {
        self.state
            .lock()
            .unwrap()
            .drafts
            .insert(template.id.clone(), template);
        self
    }

    pub(crate) fn with_published(self, template: Template) -> Self {
        self.state
            .lock()
            .unwrap()
            .published
            .insert(template.id.clone(), template);
        self
    }

    pub(crate) fn failing_on(self, operation: &'static str) -> Self {
        self.state.lock().unwrap().failing = Some(operation);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing == Some(operation) {
            Err(api_error("injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TemplateClient for FakeClient {
    async fn get_template(&self, id: &str, draft: bool) -> Result<Template, Error> {
        self.record(
            "get",
            Call::Get {
                id: id.to_string(),
                draft,
            },
        )?;
        let state = self.state.lock().unwrap();
        let copies = if draft {
            &state.drafts
        } else {
            &state.published
        };
        let mut template = copies
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        template.published = !draft;
        Ok(template)
    }

    async fn create_template(&self, template: &Template) -> Result<String, Error> {
        self.record(
            "create",
            Call::Create {
                template: template.clone(),
            },
        )?;
        let mut state = self.state.lock().unwrap();
        let id = if template.id.is_empty() {
            state.generated += 1;
            format!("generated-{}", state.generated)
        } else {
            template.id.clone()
        };
        if state.drafts.contains_key(&id) || state.published.contains_key(&id) {
            return Err(api_error("resource conflict"));
        }
        let stored = Template {
            id: id.clone(),
            ..template.clone()
        };
        if template.published {
            state.published.insert(id.clone(), stored);
        } else {
            state.drafts.insert(id.clone(), stored);
        }
        Ok(id)
    }

    async fn update_template(
        &self,
        template: &Template,
        update_published: bool,
    ) -> Result<(), Error> {
        self.record(
            "update",
            Call::Update {
                template: template.clone(),
                update_published,
            },
        )?;
        let mut state = self.state.lock().unwrap();
        let id = template.id.clone();
        if !state.drafts.contains_key(&id) && !state.published.contains_key(&id) {
            return Err(Error::NotFound(id));
        }
        if update_published || template.published {
            state.published.insert(id, template.clone());
        } else {
            state.drafts.insert(id, template.clone());
        }
        Ok(())
    }

    async fn publish_template(&self, id: &str) -> Result<(), Error> {
        self.record("publish", Call::Publish { id: id.to_string() })?;
        let mut state = self.state.lock().unwrap();
        let draft = state
            .drafts
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        state.published.insert(id.to_string(), draft);
        Ok(())
    }

    async fn delete_template(&self, id: &str) -> Result<(), Error> {
        self.record("delete", Call::Delete { id: id.to_string() })?;
        let mut state = self.state.lock().unwrap();
        let draft = state.drafts.remove(id);
        let published = state.published.remove(id);
        if draft.is_none() && published.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }
}
