use async_trait::async_trait;
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use super::catalog_model::{
    NewProduct, NewProvider, Product, ProductFilter, ProductQuote, ProductUpdate, Provider,
    ProviderFilter, ProviderUpdate,
};
use super::catalog_traits::{
    ProductRepositoryTrait, ProductServiceTrait, ProviderRepositoryTrait, ProviderServiceTrait,
};
use crate::access::{is_editor, Actor, Role};
use crate::balances::ledger;
use crate::constants::MONEY_PRECISION;
use crate::errors::{Error, Result, ValidationError};
use crate::pagination::{PageRequest, Paginated};
use crate::user_assets::valuation::daily_yield_rate;

pub struct ProviderService {
    repository: Arc<dyn ProviderRepositoryTrait>,
}

impl ProviderService {
    pub fn new(repository: Arc<dyn ProviderRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProviderServiceTrait for ProviderService {
    fn get_provider(&self, actor: Option<&Actor>, provider_id: &str) -> Result<Provider> {
        let provider = self.repository.get_by_id(provider_id)?;
        if !provider.is_active && !is_editor(actor) {
            return Err(Error::not_found("Provider", provider_id));
        }
        Ok(provider)
    }

    fn list_providers(
        &self,
        actor: Option<&Actor>,
        mut filter: ProviderFilter,
        page: PageRequest,
    ) -> Result<Paginated<Provider>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    async fn create_provider(&self, actor: &Actor, new_provider: NewProvider) -> Result<Provider> {
        actor.require(Role::Admin)?;
        new_provider.validate()?;
        let score = new_provider.score();
        let created = self.repository.create(new_provider, score).await?;
        info!(
            "Created provider {} with sustainability score {}",
            created.id, created.sustainability_score
        );
        Ok(created)
    }

    async fn update_provider(
        &self,
        actor: &Actor,
        provider_id: &str,
        update: ProviderUpdate,
    ) -> Result<Provider> {
        actor.require(Role::Admin)?;
        let mut provider = self.repository.get_by_id(provider_id)?;
        provider.apply(update);
        provider.validate()?;
        self.repository.update(provider).await
    }

    async fn delete_provider(&self, actor: &Actor, provider_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(provider_id)?;
        let products = self.repository.count_products(provider_id)?;
        if products > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Provider '{}' still has {} product(s)",
                provider_id, products
            )));
        }
        self.repository.delete(provider_id).await?;
        info!("Deleted provider {}", provider_id);
        Ok(())
    }
}

pub struct ProductService {
    repository: Arc<dyn ProductRepositoryTrait>,
    providers: Arc<dyn ProviderRepositoryTrait>,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepositoryTrait>,
        providers: Arc<dyn ProviderRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            providers,
        }
    }

    fn ensure_provider_exists(&self, provider_id: &str) -> Result<()> {
        match self.providers.get_by_id(provider_id) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                let mut errors = crate::validation::FieldErrors::default();
                errors.add("provider_id", "The selected provider_id is invalid.");
                Err(errors.into())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ProductServiceTrait for ProductService {
    fn get_product(&self, actor: Option<&Actor>, product_id: &str) -> Result<Product> {
        let product = self.repository.get_by_id(product_id)?;
        if !product.is_active && !is_editor(actor) {
            return Err(Error::not_found("Product", product_id));
        }
        Ok(product)
    }

    fn list_products(
        &self,
        actor: Option<&Actor>,
        mut filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Paginated<Product>> {
        if !is_editor(actor) {
            filter.is_active = Some(true);
        }
        self.repository.list(&filter, page)
    }

    fn quote(&self, actor: Option<&Actor>, product_id: &str, quantity: Decimal) -> Result<ProductQuote> {
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Quantity must be greater than 0".to_string(),
            )
            .into());
        }
        let product = self.get_product(actor, product_id)?;
        let total_price = ledger::investment_total(quantity, product.unit_price)?;
        let estimated_annual_return = total_price
            .checked_mul(product.annual_yield)
            .map(|v| (v / dec!(100)).round_dp(MONEY_PRECISION))
            .ok_or_else(|| Error::Calculation("Estimated return is out of range".to_string()))?;
        Ok(ProductQuote {
            product_id: product.id,
            quantity,
            unit_price: product.unit_price,
            total_price,
            min_investment: product.min_investment,
            meets_minimum: total_price >= product.min_investment,
            daily_yield: daily_yield_rate(product.annual_yield),
            estimated_annual_return,
        })
    }

    async fn create_product(&self, actor: &Actor, new_product: NewProduct) -> Result<Product> {
        actor.require(Role::Admin)?;
        new_product.validate()?;
        self.ensure_provider_exists(&new_product.provider_id)?;
        let score = new_product.score();
        let created = self.repository.create(new_product, score).await?;
        info!(
            "Created {} product {} with sustainability score {}",
            created.product_type, created.id, created.sustainability_score
        );
        Ok(created)
    }

    async fn update_product(
        &self,
        actor: &Actor,
        product_id: &str,
        update: ProductUpdate,
    ) -> Result<Product> {
        actor.require(Role::Admin)?;
        let mut product = self.repository.get_by_id(product_id)?;
        if let Some(provider_id) = &update.provider_id {
            self.ensure_provider_exists(provider_id)?;
        }
        product.apply(update);
        product.validate()?;
        self.repository.update(product).await
    }

    async fn delete_product(&self, actor: &Actor, product_id: &str) -> Result<()> {
        actor.require(Role::Admin)?;
        self.repository.get_by_id(product_id)?;
        let positions = self.repository.count_user_assets(product_id)?;
        if positions > 0 {
            return Err(Error::ConstraintViolation(format!(
                "Product '{}' is held in {} portfolio position(s)",
                product_id, positions
            )));
        }
        self.repository.delete(product_id).await?;
        info!("Deleted product {}", product_id);
        Ok(())
    }
}
