//! Promotional banner models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: String,
    pub priority: i32,
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Banner {
    /// Active and inside its (optional) display window.
    pub fn is_visible_at(&self, now: NaiveDateTime) -> bool {
        self.is_active
            && self.starts_at.map_or(true, |s| s <= now)
            && self.ends_at.map_or(true, |e| e >= now)
    }

    pub fn apply(&mut self, update: BannerUpdate) {
        if let Some(v) = update.title {
            self.title = v;
        }
        if let Some(v) = update.image_url {
            self.image_url = v;
        }
        if update.link_url.is_some() {
            self.link_url = update.link_url;
        }
        if let Some(v) = update.placement {
            self.placement = v;
        }
        if let Some(v) = update.priority {
            self.priority = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
        if update.starts_at.is_some() {
            self.starts_at = update.starts_at;
        }
        if update.ends_at.is_some() {
            self.ends_at = update.ends_at;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_banner(
            &self.title,
            &self.image_url,
            self.link_url.as_deref(),
            &self.placement,
            self.starts_at,
            self.ends_at,
        )
    }
}

fn validate_banner(
    title: &str,
    image_url: &str,
    link_url: Option<&str>,
    placement: &str,
    starts_at: Option<NaiveDateTime>,
    ends_at: Option<NaiveDateTime>,
) -> Result<()> {
    let mut v = Validator::new();
    v.required("title", title).max_len("title", title, 255);
    v.required("image_url", image_url)
        .url("image_url", Some(image_url));
    v.url("link_url", link_url);
    v.required("placement", placement)
        .max_len("placement", placement, 50);
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        v.check(
            end >= start,
            "ends_at",
            "The ends_at must be a date after starts_at.",
        );
    }
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBanner {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    #[serde(default = "default_placement")]
    pub placement: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
}

fn default_placement() -> String {
    "home".to_string()
}

fn default_true() -> bool {
    true
}

impl NewBanner {
    pub fn validate(&self) -> Result<()> {
        validate_banner(
            &self.title,
            &self.image_url,
            self.link_url.as_deref(),
            &self.placement,
            self.starts_at,
            self.ends_at,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub link_url: Option<String>,
    pub placement: Option<String>,
    pub priority: Option<i32>,
    pub is_active: Option<bool>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerFilter {
    pub placement: Option<String>,
    pub is_active: Option<bool>,
    /// Only banners active and inside their window at this instant.
    #[serde(skip)]
    pub visible_at: Option<NaiveDateTime>,
}
