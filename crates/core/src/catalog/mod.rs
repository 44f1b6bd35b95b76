//! Energy providers and the investable products they offer.

mod catalog_model;
mod catalog_service;
mod catalog_traits;
pub mod sustainability;


pub use catalog_model::{
    NewProduct, NewProvider, Product, ProductFilter, ProductQuote, ProductType, ProductUpdate,
    Provider, ProviderFilter, ProviderUpdate,
};
pub use catalog_service::{ProductService, ProviderService};
pub use catalog_traits::{
    ProductRepositoryTrait, ProductServiceTrait, ProviderRepositoryTrait, ProviderServiceTrait,
};
pub use sustainability::{sustainability_score, SustainabilityInputs};
