mod banners_model;
mod banners_service;
mod banners_traits;


pub use banners_model::{Banner, BannerFilter, BannerUpdate, NewBanner};
pub use banners_service::BannerService;
pub use banners_traits::{BannerRepositoryTrait, BannerServiceTrait};
