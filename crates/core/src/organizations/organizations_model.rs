//! Organization domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::validation::{slugify, Validator};

/// A cooperative (or sub-cooperative) customers belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewOrganization {
    /// Derives the slug from the name when none was given.
    pub fn normalized(mut self) -> Self {
        if self.slug.as_deref().map_or(true, |s| s.trim().is_empty()) {
            self.slug = Some(slugify(&self.name));
        }
        self
    }

    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.required("slug", self.slug()).slug("slug", self.slug());
        v.finish()
    }
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl OrganizationUpdate {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.required("name", name).max_len("name", name, 255);
        }
        if let Some(slug) = &self.slug {
            v.slug("slug", slug);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// Restricts the listing to these ids. Set by the service from the
    /// caller's organization scope, never by clients.
    #[serde(skip)]
    pub ids: Option<Vec<String>>,
}
