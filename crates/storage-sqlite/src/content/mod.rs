//! Repositories for the public site content.

pub mod articles;
pub mod banners;
pub mod collaborators;
pub mod contacts;
pub mod faqs;
pub mod menus;
pub mod social_links;

pub use articles::ArticleRepository;
pub use banners::BannerRepository;
pub use collaborators::CollaboratorRepository;
pub use contacts::ContactRepository;
pub use faqs::FaqRepository;
pub use menus::MenuItemRepository;
pub use social_links::SocialLinkRepository;
