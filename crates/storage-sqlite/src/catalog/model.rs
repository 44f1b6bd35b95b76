//! Database models for providers and products.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use energycoop_core::catalog::{NewProduct, NewProvider, Product, ProductType, Provider};

use crate::utils::{
    certifications_from_json, certifications_to_json, decimal_to_text, new_id, parse_decimal,
    parse_enum,
};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::providers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ProviderDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub renewable_percentage: String,
    pub co2_reduction: String,
    pub energy_efficiency: Option<String>,
    pub certifications: String,
    pub sustainability_score: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProviderDB> for Provider {
    fn from(db: ProviderDB) -> Self {
        Self {
            renewable_percentage: parse_decimal(
                &db.renewable_percentage,
                "providers.renewable_percentage",
            ),
            co2_reduction: parse_decimal(&db.co2_reduction, "providers.co2_reduction"),
            certifications: certifications_from_json(&db.certifications),
            sustainability_score: parse_decimal(
                &db.sustainability_score,
                "providers.sustainability_score",
            ),
            id: db.id,
            name: db.name,
            description: db.description,
            website: db.website,
            energy_efficiency: db.energy_efficiency,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Provider> for ProviderDB {
    fn from(p: Provider) -> Self {
        Self {
            renewable_percentage: decimal_to_text(p.renewable_percentage),
            co2_reduction: decimal_to_text(p.co2_reduction),
            certifications: certifications_to_json(&p.certifications),
            sustainability_score: decimal_to_text(p.sustainability_score),
            id: p.id,
            name: p.name,
            description: p.description,
            website: p.website,
            energy_efficiency: p.energy_efficiency,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl ProviderDB {
    pub fn from_new(new: NewProvider, score: Decimal) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            name: new.name,
            description: new.description,
            website: new.website,
            renewable_percentage: decimal_to_text(new.renewable_percentage),
            co2_reduction: decimal_to_text(new.co2_reduction),
            energy_efficiency: new.energy_efficiency,
            certifications: certifications_to_json(&new.certifications),
            sustainability_score: decimal_to_text(score),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ProductDB {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub product_type: String,
    pub description: Option<String>,
    pub unit_price: String,
    pub min_investment: String,
    pub annual_yield: String,
    pub renewable_percentage: String,
    pub co2_reduction: String,
    pub energy_efficiency: Option<String>,
    pub certifications: String,
    pub sustainability_score: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            product_type: parse_enum(&db.product_type, "products.product_type", ProductType::Solar),
            unit_price: parse_decimal(&db.unit_price, "products.unit_price"),
            min_investment: parse_decimal(&db.min_investment, "products.min_investment"),
            annual_yield: parse_decimal(&db.annual_yield, "products.annual_yield"),
            renewable_percentage: parse_decimal(
                &db.renewable_percentage,
                "products.renewable_percentage",
            ),
            co2_reduction: parse_decimal(&db.co2_reduction, "products.co2_reduction"),
            certifications: certifications_from_json(&db.certifications),
            sustainability_score: parse_decimal(
                &db.sustainability_score,
                "products.sustainability_score",
            ),
            id: db.id,
            provider_id: db.provider_id,
            name: db.name,
            description: db.description,
            energy_efficiency: db.energy_efficiency,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Product> for ProductDB {
    fn from(p: Product) -> Self {
        Self {
            product_type: p.product_type.as_str().to_string(),
            unit_price: decimal_to_text(p.unit_price),
            min_investment: decimal_to_text(p.min_investment),
            annual_yield: decimal_to_text(p.annual_yield),
            renewable_percentage: decimal_to_text(p.renewable_percentage),
            co2_reduction: decimal_to_text(p.co2_reduction),
            certifications: certifications_to_json(&p.certifications),
            sustainability_score: decimal_to_text(p.sustainability_score),
            id: p.id,
            provider_id: p.provider_id,
            name: p.name,
            description: p.description,
            energy_efficiency: p.energy_efficiency,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl ProductDB {
    pub fn from_new(new: NewProduct, score: Decimal) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            provider_id: new.provider_id,
            name: new.name,
            product_type: new.product_type.as_str().to_string(),
            description: new.description,
            unit_price: decimal_to_text(new.unit_price),
            min_investment: decimal_to_text(new.min_investment),
            annual_yield: decimal_to_text(new.annual_yield),
            renewable_percentage: decimal_to_text(new.renewable_percentage),
            co2_reduction: decimal_to_text(new.co2_reduction),
            energy_efficiency: new.energy_efficiency,
            certifications: certifications_to_json(&new.certifications),
            sustainability_score: decimal_to_text(score),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}
