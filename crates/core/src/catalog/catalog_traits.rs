use async_trait::async_trait;
use rust_decimal::Decimal;

use super::catalog_model::{
    NewProduct, NewProvider, Product, ProductFilter, ProductQuote, ProductUpdate, Provider,
    ProviderFilter, ProviderUpdate,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

#[async_trait]
pub trait ProviderRepositoryTrait: Send + Sync {
    fn get_by_id(&self, provider_id: &str) -> Result<Provider>;
    fn list(&self, filter: &ProviderFilter, page: PageRequest) -> Result<Paginated<Provider>>;
    fn count_products(&self, provider_id: &str) -> Result<i64>;
    async fn create(&self, new_provider: NewProvider, sustainability_score: Decimal) -> Result<Provider>;
    /// Replaces every mutable column with the values in `provider`.
    async fn update(&self, provider: Provider) -> Result<Provider>;
    async fn delete(&self, provider_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    fn get_by_id(&self, product_id: &str) -> Result<Product>;
    fn list(&self, filter: &ProductFilter, page: PageRequest) -> Result<Paginated<Product>>;
    fn count_user_assets(&self, product_id: &str) -> Result<i64>;
    async fn create(&self, new_product: NewProduct, sustainability_score: Decimal) -> Result<Product>;
    async fn update(&self, product: Product) -> Result<Product>;
    async fn delete(&self, product_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait ProviderServiceTrait: Send + Sync {
    fn get_provider(&self, actor: Option<&Actor>, provider_id: &str) -> Result<Provider>;
    fn list_providers(
        &self,
        actor: Option<&Actor>,
        filter: ProviderFilter,
        page: PageRequest,
    ) -> Result<Paginated<Provider>>;
    async fn create_provider(&self, actor: &Actor, new_provider: NewProvider) -> Result<Provider>;
    async fn update_provider(
        &self,
        actor: &Actor,
        provider_id: &str,
        update: ProviderUpdate,
    ) -> Result<Provider>;
    async fn delete_provider(&self, actor: &Actor, provider_id: &str) -> Result<()>;
}

#[async_trait]
pub trait ProductServiceTrait: Send + Sync {
    fn get_product(&self, actor: Option<&Actor>, product_id: &str) -> Result<Product>;
    fn list_products(
        &self,
        actor: Option<&Actor>,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Paginated<Product>>;
    fn quote(&self, actor: Option<&Actor>, product_id: &str, quantity: Decimal) -> Result<ProductQuote>;
    async fn create_product(&self, actor: &Actor, new_product: NewProduct) -> Result<Product>;
    async fn update_product(
        &self,
        actor: &Actor,
        product_id: &str,
        update: ProductUpdate,
    ) -> Result<Product>;
    async fn delete_product(&self, actor: &Actor, product_id: &str) -> Result<()>;
}
