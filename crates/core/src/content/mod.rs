//! Public site content managed by editors.
//!
//! Readers only ever see published or active records; everything else is
//! reported as not found. Editors (admin and above) see and filter all of it.

pub mod articles;
pub mod banners;
pub mod collaborators;
pub mod contacts;
pub mod faqs;
pub mod menus;
pub mod social_links;
