use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::validation::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: String,
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SocialLink {
    pub fn apply(&mut self, update: SocialLinkUpdate) {
        if let Some(v) = update.platform {
            self.platform = v;
        }
        if let Some(v) = update.url {
            self.url = v;
        }
        if update.icon.is_some() {
            self.icon = update.icon;
        }
        if let Some(v) = update.position {
            self.position = v;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_social_link(&self.platform, &self.url, self.position)
    }
}

fn validate_social_link(platform: &str, url: &str, position: i32) -> Result<()> {
    let mut v = Validator::new();
    v.required("platform", platform)
        .max_len("platform", platform, 50);
    v.required("url", url).url("url", Some(url));
    v.check(position >= 0, "position", "The position must be at least 0.");
    v.finish()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSocialLink {
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewSocialLink {
    pub fn validate(&self) -> Result<()> {
        validate_social_link(&self.platform, &self.url, self.position)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinkUpdate {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinkFilter {
    pub platform: Option<String>,
    pub is_active: Option<bool>,
}
