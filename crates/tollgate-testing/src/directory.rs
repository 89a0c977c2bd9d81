//! Builders for directory records used across lifecycle tests.

use chrono::{DateTime, Utc};

use tollgate_domain::directory::{ContactAttribute, DirectoryUser, UserAttributes, UserStatus};

pub struct DirectoryUserBuilder {
    user: DirectoryUser,
}

impl DirectoryUserBuilder {
    /// A confirmed user with no attributes and no creation date.
    pub fn new(username: &str) -> Self {
        Self {
            user: DirectoryUser {
                username: Some(username.to_owned()),
                status: UserStatus::Confirmed,
                created_at: None,
                attributes: UserAttributes::new(),
            },
        }
    }

    pub fn status(mut self, status: UserStatus) -> Self {
        self.user.status = status;
        self
    }

    pub fn unconfirmed(self) -> Self {
        self.status(UserStatus::Unconfirmed)
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.user.created_at = Some(at);
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.user.attributes.insert(name, value);
        self
    }

    pub fn subject(self, sub: &str) -> Self {
        self.attribute("sub", sub)
    }

    /// Set a contact value together with its verification flag.
    pub fn contact(self, attribute: ContactAttribute, value: &str, verified: bool) -> Self {
        let flag = if verified { "true" } else { "false" };
        self.attribute(attribute.name(), value)
            .attribute(attribute.verified_flag(), flag)
    }

    pub fn verified_email(self, email: &str) -> Self {
        self.contact(ContactAttribute::Email, email, true)
    }

    pub fn unverified_email(self, email: &str) -> Self {
        self.contact(ContactAttribute::Email, email, false)
    }

    pub fn verified_phone(self, phone: &str) -> Self {
        self.contact(ContactAttribute::PhoneNumber, phone, true)
    }

    pub fn build(self) -> DirectoryUser {
        self.user
    }
}
