use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::user_assets_model::{
    NewUserAsset, OpenPositionRequest, PortfolioSummary, UserAsset, UserAssetFilter,
    UserAssetUpdate, YieldResult,
};
use super::user_assets_traits::{UserAssetRepositoryTrait, UserAssetServiceTrait};
use super::valuation::{daily_yield_rate, summarize_portfolio};
use crate::access::{Actor, Role};
use crate::balances::{ledger, Balance, InvestmentRequest};
use crate::catalog::ProductRepositoryTrait;
use crate::errors::{Error, Result};
use crate::pagination::{PageRequest, Paginated};

pub struct UserAssetService {
    repository: Arc<dyn UserAssetRepositoryTrait>,
    products: Arc<dyn ProductRepositoryTrait>,
}

impl UserAssetService {
    pub fn new(
        repository: Arc<dyn UserAssetRepositoryTrait>,
        products: Arc<dyn ProductRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            products,
        }
    }

    fn owned_asset(&self, actor: &Actor, asset_id: &str) -> Result<UserAsset> {
        let asset = self.repository.get_by_id(asset_id)?;
        actor.require_owner_or(&asset.user_id, Role::Admin)?;
        Ok(asset)
    }
}

#[async_trait]
impl UserAssetServiceTrait for UserAssetService {
    fn get_asset(&self, actor: &Actor, asset_id: &str) -> Result<UserAsset> {
        self.owned_asset(actor, asset_id)
    }

    fn list_assets(
        &self,
        actor: &Actor,
        mut filter: UserAssetFilter,
        page: PageRequest,
    ) -> Result<Paginated<UserAsset>> {
        if !actor.has_role(Role::Admin) {
            filter.user_id = Some(actor.user_id.clone());
        }
        self.repository.list(&filter, page)
    }

    fn portfolio_summary(&self, actor: &Actor, user_id: Option<&str>) -> Result<PortfolioSummary> {
        let user_id = user_id.unwrap_or(actor.user_id.as_str());
        actor.require_owner_or(user_id, Role::Admin)?;
        let holdings = self.repository.list_with_products(user_id)?;
        debug!("Summarizing {} positions for user {}", holdings.len(), user_id);
        Ok(summarize_portfolio(user_id, &holdings))
    }

    async fn open_position(
        &self,
        actor: &Actor,
        request: OpenPositionRequest,
    ) -> Result<(UserAsset, Balance)> {
        request.validate()?;
        let user_id = match &request.user_id {
            Some(user_id) if user_id != &actor.user_id => {
                actor.require(Role::Admin)?;
                user_id.clone()
            }
            _ => actor.user_id.clone(),
        };

        let product = self.products.get_by_id(&request.product_id)?;
        if !product.is_active {
            return Err(Error::ConstraintViolation(format!(
                "Product '{}' is not available for investment",
                product.id
            )));
        }
        let investment = ledger::investment_total(request.quantity, product.unit_price)?;
        if investment < product.min_investment {
            return Err(Error::ConstraintViolation(format!(
                "The investment of {} is below the product minimum of {}",
                investment, product.min_investment
            )));
        }

        let new_asset = NewUserAsset {
            user_id: user_id.clone(),
            product_id: product.id.clone(),
            quantity: request.quantity,
            total_investment: investment,
            current_value: investment,
            daily_yield: daily_yield_rate(product.annual_yield),
            auto_reinvest: request.auto_reinvest,
        };
        let entry = ledger::investment_entry(
            &user_id,
            investment,
            &product.id,
            None,
            Some(format!("Investment in {}", product.name)),
        );
        let (asset, balance) = self.repository.open_position(new_asset, entry).await?;
        info!(
            "Opened position {} for user {} in product {} ({})",
            asset.id, user_id, product.id, investment
        );
        Ok((asset, balance))
    }

    async fn invest(
        &self,
        actor: &Actor,
        asset_id: &str,
        request: InvestmentRequest,
    ) -> Result<(UserAsset, Balance)> {
        request.validate()?;
        let asset = self.owned_asset(actor, asset_id)?;
        if !asset.is_active() {
            return Err(Error::ConstraintViolation(format!(
                "Position '{}' is inactive",
                asset.id
            )));
        }
        let entry = ledger::investment_entry(
            &asset.user_id,
            request.amount,
            &asset.product_id,
            Some(&asset.id),
            request.description,
        );
        let result = self.repository.add_investment(asset_id, entry).await?;
        info!("Added {} to position {}", request.amount, asset_id);
        Ok(result)
    }

    async fn process_yield(&self, actor: &Actor, asset_id: &str) -> Result<YieldResult> {
        self.owned_asset(actor, asset_id)?;
        let result = self
            .repository
            .process_yield(asset_id, Utc::now().naive_utc())
            .await?;
        info!(
            "Processed yield for position {}: {} -> {}",
            asset_id, result.old_value, result.new_value
        );
        Ok(result)
    }

    async fn update_asset(
        &self,
        actor: &Actor,
        asset_id: &str,
        update: UserAssetUpdate,
    ) -> Result<UserAsset> {
        self.owned_asset(actor, asset_id)?;
        self.repository.update(asset_id, update).await
    }

    async fn delete_asset(&self, actor: &Actor, asset_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        let asset = self.repository.get_by_id(asset_id)?;
        if asset.is_active() {
            return Err(Error::ConstraintViolation(format!(
                "Position '{}' is still active",
                asset_id
            )));
        }
        self.repository.delete(asset_id).await?;
        info!("Deleted position {}", asset_id);
        Ok(())
    }
}
