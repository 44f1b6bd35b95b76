use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::user_assets_model::{
    NewUserAsset, OpenPositionRequest, PortfolioSummary, UserAsset, UserAssetFilter,
    UserAssetUpdate, YieldResult,
};
use crate::access::Actor;
use crate::balances::{Balance, InvestmentRequest, NewBalanceEntry};
use crate::catalog::Product;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait UserAssetRepositoryTrait: Send + Sync {
    fn get_by_id(&self, asset_id: &str) -> Result<UserAsset>;
    fn list(&self, filter: &UserAssetFilter, page: PageRequest) -> Result<Paginated<UserAsset>>;
    /// Every position of a user joined with its product.
    fn list_with_products(&self, user_id: &str) -> Result<Vec<(UserAsset, Product)>>;

    /// Inserts the position and its investment ledger entry in one write
    /// transaction, after checking the user's available balance covers the
    /// entry. The entry is linked to the new position.
    async fn open_position(
        &self,
        new_asset: NewUserAsset,
        entry: NewBalanceEntry,
    ) -> Result<(UserAsset, Balance)>;

    /// Adds capital to an existing position: raises `total_investment` and
    /// `current_value` by the entry's magnitude and appends the entry, under
    /// the same balance check as `open_position`.
    async fn add_investment(
        &self,
        asset_id: &str,
        entry: NewBalanceEntry,
    ) -> Result<(UserAsset, Balance)>;

    /// Reads the position and applies `valuation::process_yield` inside one
    /// write transaction.
    async fn process_yield(&self, asset_id: &str, at: NaiveDateTime) -> Result<YieldResult>;

    async fn update(&self, asset_id: &str, update: UserAssetUpdate) -> Result<UserAsset>;
    async fn delete(&self, asset_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait UserAssetServiceTrait: Send + Sync {
    fn get_asset(&self, actor: &Actor, asset_id: &str) -> Result<UserAsset>;
    fn list_assets(
        &self,
        actor: &Actor,
        filter: UserAssetFilter,
        page: PageRequest,
    ) -> Result<Paginated<UserAsset>>;
    /// Summary of `user_id`, or of the caller when `None`.
    fn portfolio_summary(&self, actor: &Actor, user_id: Option<&str>) -> Result<PortfolioSummary>;
    async fn open_position(
        &self,
        actor: &Actor,
        request: OpenPositionRequest,
    ) -> Result<(UserAsset, Balance)>;
    async fn invest(
        &self,
        actor: &Actor,
        asset_id: &str,
        request: InvestmentRequest,
    ) -> Result<(UserAsset, Balance)>;
    async fn process_yield(&self, actor: &Actor, asset_id: &str) -> Result<YieldResult>;
    async fn update_asset(
        &self,
        actor: &Actor,
        asset_id: &str,
        update: UserAssetUpdate,
    ) -> Result<UserAsset>;
    async fn delete_asset(&self, actor: &Actor, asset_id: &str) -> Result<()>;
}
