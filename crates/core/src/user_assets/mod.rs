//! Portfolio positions held by users and their valuation.

mod user_assets_model;
mod user_assets_service;
mod user_assets_traits;
pub mod valuation;


pub use user_assets_model::{
    AssetPerformance, AssetStatus, NewUserAsset, OpenPositionRequest, PortfolioSummary,
    TypeAllocation, UserAsset, UserAssetFilter, UserAssetUpdate, YieldResult,
};
pub use user_assets_service::UserAssetService;
pub use user_assets_traits::{UserAssetRepositoryTrait, UserAssetServiceTrait};
