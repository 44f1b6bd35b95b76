//! Partner and sponsor logos shown on the public site.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorType {
    Partner,
    Sponsor,
    Institution,
    Supplier,
}

impl CollaboratorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollaboratorType::Partner => "partner",
            CollaboratorType::Sponsor => "sponsor",
            CollaboratorType::Institution => "institution",
            CollaboratorType::Supplier => "supplier",
        }
    }
}

impl fmt::Display for CollaboratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollaboratorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "partner" => Ok(CollaboratorType::Partner),
            "sponsor" => Ok(CollaboratorType::Sponsor),
            "institution" => Ok(CollaboratorType::Institution),
            "supplier" => Ok(CollaboratorType::Supplier),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown collaborator type '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub collaborator_type: CollaboratorType,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Collaborator {
    pub fn apply(&mut self, update: CollaboratorUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.logo_url.is_some() {
            self.logo_url = update.logo_url;
        }
        if update.website.is_some() {
            self.website = update.website;
        }
        if let Some(v) = update.collaborator_type {
            self.collaborator_type = v;
        }
        if let Some(v) = update.position {
            self.position = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_collaborator(
            &self.name,
            self.logo_url.as_deref(),
            self.website.as_deref(),
            self.position,
        )
    }
}

fn validate_collaborator(
    name: &str,
    logo_url: Option<&str>,
    website: Option<&str>,
    position: i32,
) -> Result<()> {
    let mut v = Validator::new();
    v.required("name", name).max_len("name", name, 255);
    v.url("logo_url", logo_url).url("website", website);
    v.check(position >= 0, "position", "The position must be at least 0.");
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollaborator {
    pub name: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub collaborator_type: CollaboratorType,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewCollaborator {
    pub fn validate(&self) -> Result<()> {
        validate_collaborator(
            &self.name,
            self.logo_url.as_deref(),
            self.website.as_deref(),
            self.position,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorUpdate {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub collaborator_type: Option<CollaboratorType>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorFilter {
    pub collaborator_type: Option<CollaboratorType>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}
