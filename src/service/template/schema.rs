use crate::service::schema::{Attribute, AttributeType, Mode, Schema};

const ID: &str = "Unique alphanumeric ID used to reference the template. Must be unique across the SparkPost account. Maximum length - 64 bytes";
const DRAFT: &str = "Whether or not to read the draft or published version of the template.";

/// Attributes mirrored from the remote template, with the mode they have in
/// the resource.
const CONTENT: &[(&str, AttributeType, Mode, &str)] = &[
    (
        "name",
        AttributeType::String,
        Mode::Required,
        "Editable display name. At a minimum, id or name is required upon creation. Does not have to be unique. Maximum length - 1024 bytes",
    ),
    (
        "published",
        AttributeType::Bool,
        Mode::Optional,
        "Whether or not the template is published.",
    ),
    (
        "description",
        AttributeType::String,
        Mode::Optional,
        "Description of the template. Maximum length - 1024 bytes",
    ),
    (
        "content_html",
        AttributeType::String,
        Mode::Optional,
        "HTML content for the email's text/html MIME part. At a minimum, html or text is required.",
    ),
    (
        "content_text",
        AttributeType::String,
        Mode::Optional,
        "Text content for the email's text/plain MIME part. At a minimum, html or text is required.",
    ),
    (
        "content_subject",
        AttributeType::String,
        Mode::Required,
        "The subject for the template.",
    ),
    (
        "content_from_email",
        AttributeType::String,
        Mode::Required,
        "Email address used to compose the email's From header. The domain must be a verified sending domain.",
    ),
    (
        "content_from_name",
        AttributeType::String,
        Mode::Optional,
        "Name used to compose the email's From header.",
    ),
    (
        "content_reply_to",
        AttributeType::String,
        Mode::Optional,
        "Email address used to compose the email's Reply-To header.",
    ),
    (
        "content_headers",
        AttributeType::StringMap,
        Mode::Optional,
        "Object containing headers other than Subject, From, To, and Reply-To",
    ),
    (
        "content_email_rfc822",
        AttributeType::String,
        Mode::Optional,
        "Pre-built message with the format as described by the message/rfc822 Content-Type.",
    ),
    (
        "options_open_tracking",
        AttributeType::Bool,
        Mode::Optional,
        "Enable or disable open tracking.",
    ),
    (
        "options_click_tracking",
        AttributeType::Bool,
        Mode::Optional,
        "Enable or disable click tracking.",
    ),
    (
        "options_transactional",
        AttributeType::Bool,
        Mode::Optional,
        "Distinguish between transactional and non-transactional messages for unsubscribe and suppression purposes.",
    ),
];

pub fn resource() -> Schema {
    let schema = Schema::default()
        .with_attribute("id", Attribute::computed(AttributeType::String, ID))
        .with_attribute(
            "template_id",
            Attribute::optional(
                AttributeType::String,
                "Unique alphanumeric ID used to set the template ID. Must be unique across the SparkPost account. Maximum length - 64 bytes",
            )
            .force_new(),
        )
        .with_attribute(
            "draft",
            Attribute::optional(AttributeType::Bool, DRAFT)
                .with_default(false)
                .diff_suppressed(),
        );
    CONTENT
        .iter()
        .fold(schema, |schema, (name, kind, mode, description)| {
            let attribute = match mode {
                Mode::Required => Attribute::required(*kind, *description),
                _ => Attribute::optional(*kind, *description),
            };
            let attribute = match kind {
                AttributeType::Bool => attribute.with_default(false),
                _ => attribute,
            };
            schema.with_attribute(*name, attribute)
        })
}

/// Read-only mirror of the resource, looked up by id.
pub fn data_source() -> Schema {
    let schema = Schema::default()
        .with_attribute("id", Attribute::required(AttributeType::String, ID))
        .with_attribute(
            "draft",
            Attribute::optional(AttributeType::Bool, DRAFT).with_default(false),
        );
    CONTENT
        .iter()
        .fold(schema, |schema, (name, kind, _, description)| {
            schema.with_attribute(*name, Attribute::computed(*kind, *description))
        })
}
