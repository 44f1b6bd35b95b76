//! Messages submitted through the public contact form.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Read => "read",
            ContactStatus::Replied => "replied",
            ContactStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(ContactStatus::New),
            "read" => Ok(ContactStatus::Read),
            "replied" => Ok(ContactStatus::Replied),
            "archived" => Ok(ContactStatus::Archived),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown contact status '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Contact form submission. The status always starts as `new`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl NewContact {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.required("email", &self.email).email("email", &self.email);
        if let Some(phone) = &self.phone {
            v.max_len("phone", phone, 30);
        }
        if let Some(subject) = &self.subject {
            v.max_len("subject", subject, 255);
        }
        v.required("message", &self.message)
            .max_len("message", &self.message, 5000);
        v.finish()
    }
}

/// Staff only move a message through its status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
    pub search: Option<String>,
}
