//! Records read from the external user directory.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account status as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Unconfirmed,
    Confirmed,
    Archived,
    ResetRequired,
    ForceChangePassword,
    ExternalProvider,
    Unknown,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconfirmed => "UNCONFIRMED",
            Self::Confirmed => "CONFIRMED",
            Self::Archived => "ARCHIVED",
            Self::ResetRequired => "RESET_REQUIRED",
            Self::ForceChangePassword => "FORCE_CHANGE_PASSWORD",
            Self::ExternalProvider => "EXTERNAL_PROVIDER",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = std::convert::Infallible;

    /// Unrecognised statuses map to `Unknown` rather than failing the whole page.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UNCONFIRMED" => Self::Unconfirmed,
            "CONFIRMED" => Self::Confirmed,
            "ARCHIVED" => Self::Archived,
            "RESET_REQUIRED" => Self::ResetRequired,
            "FORCE_CHANGE_PASSWORD" => Self::ForceChangePassword,
            "EXTERNAL_PROVIDER" => Self::ExternalProvider,
            _ => Self::Unknown,
        })
    }
}

/// Contact channels subject to uniqueness enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactAttribute {
    Email,
    PhoneNumber,
}

impl ContactAttribute {
    /// Check order for uniqueness enforcement.
    pub const ALL: [ContactAttribute; 2] = [Self::Email, Self::PhoneNumber];

    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }

    /// Name of the attribute holding this channel's verified flag.
    pub fn verified_flag(self) -> &'static str {
        match self {
            Self::Email => "email_verified",
            Self::PhoneNumber => "phone_number_verified",
        }
    }
}

impl fmt::Display for ContactAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw attribute bag of a directory user, keyed by attribute name.
///
/// Unknown attributes are kept but only the contact channels and `sub` are interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAttributes(BTreeMap<String, String>);

impl UserAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Non-empty value of `name`, if any.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Stable directory subject id.
    pub fn subject(&self) -> Option<&str> {
        self.non_empty("sub")
    }

    /// A flag is set only when its stored value is `true` (any case).
    pub fn is_verified(&self, attribute: ContactAttribute) -> bool {
        self.get(attribute.verified_flag())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    /// True when no contact channel carries a verified flag.
    pub fn has_no_verified_contact(&self) -> bool {
        ContactAttribute::ALL.iter().all(|a| !self.is_verified(*a))
    }
}

impl<K, V> FromIterator<(K, V)> for UserAttributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A user as read from the directory. Never mutated here, only deleted.
///
/// `username` and `created_at` are optional because directory pages may carry
/// partial records; such users cannot be acted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryUser {
    pub username: Option<String>,
    pub status: UserStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub attributes: UserAttributes,
}

/// Search filter accepted by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryFilter {
    AttributeEquals {
        attribute: ContactAttribute,
        value: String,
    },
    StatusEquals(UserStatus),
}

impl fmt::Display for DirectoryFilter {
    /// Directory filter-expression form, e.g. `email = "a@example.com"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeEquals { attribute, value } => {
                write!(f, "{} = \"{}\"", attribute.name(), value.replace('"', "\\\""))
            }
            Self::StatusEquals(status) => write!(f, "status = \"{status}\""),
        }
    }
}
