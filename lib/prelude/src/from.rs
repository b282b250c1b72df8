use lettre::address::AddressError;
use lettre::message::Mailbox;
use lettre::Address;
use std::fmt;
use std::str::FromStr;

/// Raw `content.from` as exchanged with the API: either a composed address
/// (`Name <email>`) or an object with `email` and `name`.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum FromValue {
    Address(String),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl Default for FromValue {
    fn default() -> Self {
        Self::Address(String::new())
    }
}

impl FromValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Address(inner) => inner.is_empty(),
            Self::Object(inner) => inner.is_empty(),
        }
    }

    /// Object form sent to the API, the name is omitted when empty.
    pub fn object(email: &str, name: &str) -> Self {
        let mut map = serde_json::Map::new();
        map.insert("email".into(), serde_json::Value::String(email.to_string()));
        if !name.is_empty() {
            map.insert("name".into(), serde_json::Value::String(name.to_string()));
        }
        Self::Object(map)
    }
}

impl From<FromAddress> for FromValue {
    fn from(value: FromAddress) -> Self {
        Self::object(&value.email.to_string(), &value.name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseFromError {
    #[error("from address has no email")]
    MissingEmail,
    #[error("invalid from address {input:?}: {source}")]
    Invalid {
        input: String,
        #[source]
        source: AddressError,
    },
    #[error("unexpected key {0:?} in from address")]
    UnexpectedKey(String),
    #[error("from address field {0:?} should be a string")]
    UnexpectedValue(String),
}

impl ParseFromError {
    fn invalid(input: &str, source: AddressError) -> Self {
        Self::Invalid {
            input: input.to_string(),
            source,
        }
    }
}

/// Sender of a template, split in its two components. The email is always a
/// valid address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FromAddress {
    pub email: Address,
    pub name: String,
}

impl FromAddress {
    fn from_object(
        map: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ParseFromError> {
        let mut email = String::new();
        let mut name = String::new();
        for (key, value) in map.iter() {
            let target = match key.as_str() {
                "email" => &mut email,
                "name" => &mut name,
                other => return Err(ParseFromError::UnexpectedKey(other.to_string())),
            };
            match value {
                serde_json::Value::String(inner) => *target = inner.trim().to_string(),
                serde_json::Value::Null => {}
                _ => return Err(ParseFromError::UnexpectedValue(key.clone())),
            }
        }
        if email.is_empty() {
            return Err(ParseFromError::MissingEmail);
        }
        let address = email
            .parse::<Address>()
            .map_err(|err| ParseFromError::invalid(&email, err))?;
        Ok(Self {
            email: address,
            name,
        })
    }
}

impl From<Mailbox> for FromAddress {
    fn from(value: Mailbox) -> Self {
        Self {
            email: value.email,
            name: value.name.unwrap_or_default(),
        }
    }
}

impl From<FromAddress> for Mailbox {
    fn from(value: FromAddress) -> Self {
        let name = Some(value.name).filter(|name| !name.is_empty());
        Mailbox::new(name, value.email)
    }
}

impl FromStr for FromAddress {
    type Err = ParseFromError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseFromError::MissingEmail);
        }
        trimmed
            .parse::<Mailbox>()
            .map(Self::from)
            .map_err(|err| ParseFromError::invalid(input, err))
    }
}

impl TryFrom<&FromValue> for FromAddress {
    type Error = ParseFromError;

    fn try_from(value: &FromValue) -> Result<Self, Self::Error> {
        match value {
            FromValue::Address(inner) => inner.parse(),
            FromValue::Object(inner) => Self::from_object(inner),
        }
    }
}

impl fmt::Display for FromAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Mailbox::from(self.clone()))
    }
}
