mod social_links_model;
mod social_links_service;
mod social_links_traits;

#[cfg(test)]
mod social_links_service_tests;

pub use social_links_model::{NewSocialLink, SocialLink, SocialLinkFilter, SocialLinkUpdate};
pub use social_links_service::SocialLinkService;
pub use social_links_traits::{SocialLinkRepositoryTrait, SocialLinkServiceTrait};
