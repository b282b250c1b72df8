use super::{mapper, TemplateAttributes, TemplateState};
use crate::error::Error;
use sparkpost_client::TemplateClient;
use std::sync::Arc;

/// Remote calls needed to apply an update, depending on whether the template
/// was published before and should be published after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Only the draft is written.
    Draft,
    /// The draft is written then published.
    Publish,
    /// The published copy is overwritten in place.
    Overwrite,
}

impl Reconciliation {
    pub fn new(prior_published: bool, desired_published: bool) -> Self {
        match (prior_published, desired_published) {
            (false, true) => Self::Publish,
            (true, true) => Self::Overwrite,
            _ => Self::Draft,
        }
    }

    pub fn update_published(&self) -> bool {
        matches!(self, Self::Overwrite)
    }

    /// The `published` field of the body overrides the `update_published`
    /// parameter, it must stay `false` unless the published copy is targeted.
    pub fn body_published(&self) -> bool {
        matches!(self, Self::Overwrite)
    }

    pub fn publish_after(&self) -> bool {
        matches!(self, Self::Publish)
    }
}

fn remote_error(operation: &'static str, id: &str, err: sparkpost_client::Error) -> Error {
    metrics::counter!("remote_error", "operation" => operation).increment(1);
    tracing::error!("unable to {} template {:?}: {}", operation, id, err);
    Error::from(err)
}

#[derive(Clone, Debug)]
pub struct TemplateResource {
    client: Arc<dyn TemplateClient>,
}

impl TemplateResource {
    pub fn new(client: Arc<dyn TemplateClient>) -> Self {
        Self { client }
    }

    /// Fetches the draft or the published copy, the published one by default.
    /// Returns `None` when the template doesn't exist anymore, so that the host
    /// drops it from its state.
    pub async fn read(
        &self,
        id: &str,
        draft: Option<bool>,
    ) -> Result<Option<TemplateState>, Error> {
        let draft = draft.unwrap_or(false);
        tracing::debug!("reading template {:?} (draft: {})", id, draft);
        let template = match self.client.get_template(id, draft).await {
            Ok(found) => found,
            Err(err) if err.is_not_found() => {
                tracing::warn!("template {:?} not found, removing from state", id);
                return Ok(None);
            }
            Err(err) => return Err(remote_error("read", id, err)),
        };
        let mut attributes = mapper::from_remote(&template)?;
        attributes.draft = draft;
        Ok(Some(TemplateState {
            id: id.to_string(),
            attributes,
        }))
    }

    async fn refresh(
        &self,
        id: &str,
        draft: bool,
        template_id: Option<String>,
    ) -> Result<TemplateState, Error> {
        let mut state = self
            .read(id, Some(draft))
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        state.attributes.template_id = template_id;
        Ok(state)
    }

    async fn publish(&self, id: &str) -> Result<(), Error> {
        self.client
            .publish_template(id)
            .await
            .map_err(|err| remote_error("publish", id, err))?;
        tracing::info!("published template {:?}", id);
        Ok(())
    }

    pub async fn create(&self, desired: &TemplateAttributes) -> Result<TemplateState, Error> {
        let requested = desired.template_id.as_deref().unwrap_or_default();
        let mut template = mapper::to_remote(requested, desired);
        // publishing goes through its own call, the created copy is the draft
        template.published = false;
        let id = self
            .client
            .create_template(&template)
            .await
            .map_err(|err| remote_error("create", requested, err))?;
        tracing::info!("created template {:?}", id);
        if desired.published {
            self.publish(&id).await?;
        }
        self.refresh(&id, !desired.published, desired.template_id.clone())
            .await
    }

    /// Always writes the draft, then publishes or overwrites the published copy
    /// according to the [`Reconciliation`].
    pub async fn update(
        &self,
        id: &str,
        prior_published: bool,
        desired: &TemplateAttributes,
    ) -> Result<TemplateState, Error> {
        if let Some(requested) = desired.template_id.as_deref().filter(|value| *value != id) {
            return Err(Error::Immutable {
                name: "template_id",
                current: id.to_string(),
                requested: requested.to_string(),
            });
        }
        let reconciliation = Reconciliation::new(prior_published, desired.published);
        tracing::debug!("updating template {:?} with {:?}", id, reconciliation);
        let mut template = mapper::to_remote(id, desired);
        template.published = reconciliation.body_published();
        self.client
            .update_template(&template, reconciliation.update_published())
            .await
            .map_err(|err| remote_error("update", id, err))?;
        if reconciliation.publish_after() {
            self.publish(id).await?;
        }
        self.refresh(id, !desired.published, desired.template_id.clone())
            .await
    }

    /// Removes both copies. A template already gone is considered deleted.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        match self.client.delete_template(id).await {
            Ok(_) => {
                tracing::info!("deleted template {:?}", id);
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!("template {:?} already deleted", id);
                Ok(())
            }
            Err(err) => Err(remote_error("delete", id, err)),
        }
    }

    /// Only published templates can be imported.
    pub async fn import(&self, id: &str) -> Result<TemplateState, Error> {
        self.read(id, Some(false))
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Reconciliation, TemplateResource};
    use crate::error::Error;
    use crate::service::template::{mapper, TemplateAttributes};
    use crate::test_util::{Call, FakeClient};
    use std::sync::Arc;

    fn desired(published: bool) -> TemplateAttributes {
        TemplateAttributes {
            name: "Welcome".into(),
            published,
            content_subject: "Hello".into(),
            content_from_email: "sender@example.com".into(),
            content_from_name: Some("Example Sender".into()),
            content_text: Some("Hello world".into()),
            ..Default::default()
        }
    }

    fn setup(client: FakeClient) -> (Arc<FakeClient>, TemplateResource) {
        crate::try_init_logs();
        let client = Arc::new(client);
        (client.clone(), TemplateResource::new(client))
    }

    fn is_publish(call: &Call) -> bool {
        matches!(call, Call::Publish { .. })
    }

    #[test]
    fn should_pick_reconciliation() {
        assert_eq!(Reconciliation::new(false, false), Reconciliation::Draft);
        assert_eq!(Reconciliation::new(true, false), Reconciliation::Draft);
        assert_eq!(Reconciliation::new(false, true), Reconciliation::Publish);
        assert_eq!(Reconciliation::new(true, true), Reconciliation::Overwrite);
        assert!(!Reconciliation::Publish.body_published());
        assert!(!Reconciliation::Publish.update_published());
        assert!(Reconciliation::Overwrite.update_published());
        assert!(!Reconciliation::Overwrite.publish_after());
    }

    #[tokio::test]
    async fn create_draft_should_not_publish() {
        let (client, resource) = setup(FakeClient::default());
        let state = resource.create(&desired(false)).await.unwrap();
        assert_eq!(state.id, "generated-1");
        assert!(state.attributes.draft);
        assert!(!state.attributes.published);
        assert_eq!(client.count(is_publish), 0);
        assert_eq!(
            client.calls().last(),
            Some(&Call::Get {
                id: "generated-1".into(),
                draft: true
            })
        );
    }

    #[tokio::test]
    async fn create_published_should_create_then_publish() {
        let (client, resource) = setup(FakeClient::default());
        let mut attributes = desired(true);
        attributes.template_id = Some("welcome".into());
        let state = resource.create(&attributes).await.unwrap();
        assert_eq!(state.id, "welcome");
        assert!(!state.attributes.draft);
        assert!(state.attributes.published);
        assert_eq!(state.attributes.template_id.as_deref(), Some("welcome"));
        let calls = client.calls();
        assert_eq!(calls.len(), 3);
        match &calls[0] {
            Call::Create { template } => {
                assert_eq!(template.id, "welcome");
                assert!(!template.published);
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(calls[1], Call::Publish { id: "welcome".into() });
        assert_eq!(
            calls[2],
            Call::Get {
                id: "welcome".into(),
                draft: false
            }
        );
    }

    #[tokio::test]
    async fn create_should_stop_on_publish_failure() {
        let (client, resource) = setup(FakeClient::default().failing_on("publish"));
        let err = resource.create(&desired(true)).await.unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
        assert!(!client.calls().iter().any(|call| matches!(call, Call::Get { .. })));
    }

    #[tokio::test]
    async fn update_to_published_should_force_draft_body_then_publish() {
        let existing = mapper::to_remote("welcome", &desired(false));
        let (client, resource) = setup(FakeClient::default().with_draft(existing));
        let state = resource.update("welcome", false, &desired(true)).await.unwrap();
        assert!(state.attributes.published);
        assert!(!state.attributes.draft);
        let calls = client.calls();
        match &calls[0] {
            Call::Update {
                template,
                update_published,
            } => {
                assert!(!template.published);
                assert!(!update_published);
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(calls[1], Call::Publish { id: "welcome".into() });
        assert_eq!(client.count(is_publish), 1);
    }

    #[tokio::test]
    async fn update_published_should_overwrite_in_place() {
        let mut existing = mapper::to_remote("welcome", &desired(true));
        existing.published = true;
        let (client, resource) = setup(FakeClient::default().with_published(existing));
        let mut attributes = desired(true);
        attributes.content_subject = "Hello again".into();
        let state = resource.update("welcome", true, &attributes).await.unwrap();
        assert_eq!(state.attributes.content_subject, "Hello again");
        assert!(!state.attributes.draft);
        match &client.calls()[0] {
            Call::Update {
                update_published, ..
            } => assert!(update_published),
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(client.count(is_publish), 0);
    }

    #[tokio::test]
    async fn update_draft_should_only_write_draft() {
        let existing = mapper::to_remote("welcome", &desired(false));
        let (client, resource) = setup(FakeClient::default().with_draft(existing));
        let mut attributes = desired(false);
        attributes.description = Some("updated".into());
        let state = resource.update("welcome", false, &attributes).await.unwrap();
        assert!(state.attributes.draft);
        assert_eq!(state.attributes.description.as_deref(), Some("updated"));
        match &client.calls()[0] {
            Call::Update {
                template,
                update_published,
            } => {
                assert!(!template.published);
                assert!(!update_published);
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(client.count(is_publish), 0);
    }

    #[tokio::test]
    async fn update_should_stop_on_failure() {
        let existing = mapper::to_remote("welcome", &desired(false));
        let (client, resource) =
            setup(FakeClient::default().with_draft(existing).failing_on("update"));
        let err = resource
            .update("welcome", false, &desired(true))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("injected failure"));
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn update_should_refuse_another_template_id() {
        let existing = mapper::to_remote("welcome", &desired(false));
        let (client, resource) = setup(FakeClient::default().with_draft(existing));
        let mut attributes = desired(false);
        attributes.template_id = Some("goodbye".into());
        let err = resource
            .update("welcome", false, &attributes)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Immutable { name: "template_id", .. }));
        assert!(client.calls().is_empty());

        attributes.template_id = Some("welcome".into());
        let state = resource.update("welcome", false, &attributes).await.unwrap();
        assert_eq!(state.attributes.template_id.as_deref(), Some("welcome"));
    }

    #[tokio::test]
    async fn read_should_default_to_published_copy() {
        let (client, resource) = setup(FakeClient::default());
        let state = resource.read("welcome", None).await.unwrap();
        assert!(state.is_none());
        assert_eq!(
            client.calls(),
            vec![Call::Get {
                id: "welcome".into(),
                draft: false
            }]
        );
    }

    #[tokio::test]
    async fn read_should_fail_on_malformed_sender() {
        let mut existing = mapper::to_remote("welcome", &desired(false));
        existing.content.from =
            sparkpost_prelude::FromValue::Address("Example <sender@example.com".into());
        let (_, resource) = setup(FakeClient::default().with_draft(existing));
        let err = resource.read("welcome", Some(true)).await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn delete_should_ignore_missing_template() {
        let (client, resource) = setup(FakeClient::default());
        resource.delete("welcome").await.unwrap();
        assert_eq!(client.calls(), vec![Call::Delete { id: "welcome".into() }]);
    }

    #[tokio::test]
    async fn delete_should_surface_other_errors() {
        let existing = mapper::to_remote("welcome", &desired(false));
        let (_, resource) = setup(FakeClient::default().with_draft(existing).failing_on("delete"));
        assert!(resource.delete("welcome").await.is_err());
    }

    #[tokio::test]
    async fn import_should_only_find_published_templates() {
        let existing = mapper::to_remote("welcome", &desired(false));
        let (_, resource) = setup(FakeClient::default().with_draft(existing.clone()));
        assert!(resource.import("welcome").await.unwrap_err().is_not_found());

        let (_, resource) = setup(FakeClient::default().with_published(existing));
        let state = resource.import("welcome").await.unwrap();
        assert_eq!(state.id, "welcome");
        assert!(!state.attributes.draft);
        assert_eq!(state.attributes.content_from_name.as_deref(), Some("Example Sender"));
    }
}
