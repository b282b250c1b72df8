use super::TemplateAttributes;
use crate::error::Error;
use sparkpost_prelude::{Content, FromAddress, FromValue, Template, TemplateOptions};

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Builds the template sent to SparkPost. The tracking options are always
/// explicit, so that a flag set back to `false` is sent as such.
pub fn to_remote(id: &str, attributes: &TemplateAttributes) -> Template {
    let from = FromValue::object(
        &attributes.content_from_email,
        attributes.content_from_name.as_deref().unwrap_or_default(),
    );
    Template {
        id: id.to_string(),
        name: attributes.name.clone(),
        published: attributes.published,
        description: or_empty(&attributes.description),
        content: Content {
            html: or_empty(&attributes.content_html),
            text: or_empty(&attributes.content_text),
            subject: attributes.content_subject.clone(),
            from,
            reply_to: or_empty(&attributes.content_reply_to),
            headers: attributes.content_headers.clone(),
            email_rfc822: or_empty(&attributes.content_email_rfc822),
        },
        options: Some(TemplateOptions {
            open_tracking: Some(attributes.options_open_tracking),
            click_tracking: Some(attributes.options_click_tracking),
            transactional: Some(attributes.options_transactional),
        }),
    }
}

/// Reads back a template fetched from SparkPost. The local only attributes,
/// `template_id` and `draft`, are left to their default.
pub fn from_remote(template: &Template) -> Result<TemplateAttributes, Error> {
    let from = FromAddress::try_from(&template.content.from).map_err(|err| {
        tracing::error!(
            "unable to parse sender of template {:?}: {:?}",
            template.id,
            err
        );
        Error::from(err)
    })?;
    let options = template.options.clone().unwrap_or_default();
    Ok(TemplateAttributes {
        template_id: None,
        draft: false,
        name: template.name.clone(),
        published: template.published,
        description: non_empty(&template.description),
        content_html: non_empty(&template.content.html),
        content_text: non_empty(&template.content.text),
        content_subject: template.content.subject.clone(),
        content_from_email: from.email.to_string(),
        content_from_name: non_empty(&from.name),
        content_reply_to: non_empty(&template.content.reply_to),
        content_headers: template.content.headers.clone(),
        content_email_rfc822: non_empty(&template.content.email_rfc822),
        options_open_tracking: options.open_tracking.unwrap_or_default(),
        options_click_tracking: options.click_tracking.unwrap_or_default(),
        options_transactional: options.transactional.unwrap_or_default(),
    })
}
