//! News and blog article models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::validation::{slugify, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
            ArticleStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(ArticleStatus::Draft),
            "published" => Ok(ArticleStatus::Published),
            "archived" => Ok(ArticleStatus::Archived),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown article status '{}'",
                other
            )))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub status: ArticleStatus,
    pub featured: bool,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Applies an update; the first transition to published stamps `published_at`.
    pub fn apply(&mut self, update: ArticleUpdate, now: NaiveDateTime) {
        if let Some(v) = update.title {
            self.title = v;
        }
        if let Some(v) = update.slug {
            self.slug = v;
        }
        if update.excerpt.is_some() {
            self.excerpt = update.excerpt;
        }
        if let Some(v) = update.body {
            self.body = v;
        }
        if update.category.is_some() {
            self.category = update.category;
        }
        if let Some(v) = update.featured {
            self.featured = v;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if self.is_published() && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_article(&self.title, &self.slug, &self.body)
    }
}

fn validate_article(title: &str, slug: &str, body: &str) -> Result<()> {
    let mut v = Validator::new();
    v.required("title", title).max_len("title", title, 255);
    v.required("slug", slug).slug("slug", slug);
    v.required("body", body);
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: String,
    pub category: Option<String>,
    #[serde(default = "default_status")]
    pub status: ArticleStatus,
    #[serde(default)]
    pub featured: bool,
}

fn default_status() -> ArticleStatus {
    ArticleStatus::Draft
}

impl NewArticle {
    pub fn normalized(mut self) -> Self {
        if self.slug.as_deref().map_or(true, |s| s.trim().is_empty()) {
            self.slug = Some(slugify(&self.title));
        }
        self
    }

    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        validate_article(&self.title, self.slug(), &self.body)
    }
}

/// A validated article ready to be stored.
#[derive(Debug, Clone)]
pub struct NewArticleRecord {
    pub article: NewArticle,
    pub author_id: Option<String>,
    pub published_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub category: Option<String>,
    pub status: Option<ArticleStatus>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_publishing_stamps_published_at_once() {
        let created = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut article = Article {
            id: "a1".to_string(),
            title: "Solar season".to_string(),
            slug: "solar-season".to_string(),
            excerpt: None,
            body: "Body".to_string(),
            category: None,
            author_id: None,
            status: ArticleStatus::Draft,
            featured: false,
            published_at: None,
            created_at: created,
            updated_at: created,
        };
        let first = created + chrono::Duration::days(1);
        article.apply(
            ArticleUpdate {
                status: Some(ArticleStatus::Published),
                ..Default::default()
            },
            first,
        );
        assert_eq!(article.published_at, Some(first));

        article.apply(ArticleUpdate::default(), first + chrono::Duration::days(1));
        assert_eq!(article.published_at, Some(first));
    }
}
