//! Provider and product domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::sustainability::{sustainability_score, SustainabilityInputs, ENERGY_GRADES};
use crate::errors::{Error, Result, ValidationError};
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Solar,
    Wind,
    Hydro,
    Biomass,
    Storage,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Solar => "solar",
            ProductType::Wind => "wind",
            ProductType::Hydro => "hydro",
            ProductType::Biomass => "biomass",
            ProductType::Storage => "storage",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "solar" => Ok(ProductType::Solar),
            "wind" => Ok(ProductType::Wind),
            "hydro" => Ok(ProductType::Hydro),
            "biomass" => Ok(ProductType::Biomass),
            "storage" => Ok(ProductType::Storage),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown product type '{}'",
                other
            )))),
        }
    }
}

/// Validation shared by every input that carries sustainability fields.
fn validate_sustainability(
    v: &mut Validator,
    renewable_percentage: Decimal,
    co2_reduction: Decimal,
    energy_efficiency: Option<&str>,
) {
    v.between("renewable_percentage", renewable_percentage, Decimal::ZERO, dec!(100));
    v.non_negative("co2_reduction", co2_reduction);
    if let Some(grade) = energy_efficiency {
        v.one_of("energy_efficiency", grade, &ENERGY_GRADES);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub renewable_percentage: Decimal,
    pub co2_reduction: Decimal,
    pub energy_efficiency: Option<String>,
    pub certifications: Vec<String>,
    pub sustainability_score: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Provider {
    pub fn compute_score(&self) -> Decimal {
        sustainability_score(SustainabilityInputs {
            renewable_percentage: self.renewable_percentage,
            co2_reduction: self.co2_reduction,
            energy_efficiency: self.energy_efficiency.as_deref(),
            certification_count: self.certifications.len(),
        })
    }

    pub fn apply(&mut self, update: ProviderUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.website.is_some() {
            self.website = update.website;
        }
        if let Some(v) = update.renewable_percentage {
            self.renewable_percentage = v;
        }
        if let Some(v) = update.co2_reduction {
            self.co2_reduction = v;
        }
        if update.energy_efficiency.is_some() {
            self.energy_efficiency = update.energy_efficiency;
        }
        if let Some(certs) = update.certifications {
            self.certifications = certs;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        self.sustainability_score = self.compute_score();
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.url("website", self.website.as_deref());
        validate_sustainability(
            &mut v,
            self.renewable_percentage,
            self.co2_reduction,
            self.energy_efficiency.as_deref(),
        );
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProvider {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub renewable_percentage: Decimal,
    #[serde(default)]
    pub co2_reduction: Decimal,
    pub energy_efficiency: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewProvider {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.url("website", self.website.as_deref());
        validate_sustainability(
            &mut v,
            self.renewable_percentage,
            self.co2_reduction,
            self.energy_efficiency.as_deref(),
        );
        v.finish()
    }

    pub fn score(&self) -> Decimal {
        sustainability_score(SustainabilityInputs {
            renewable_percentage: self.renewable_percentage,
            co2_reduction: self.co2_reduction,
            energy_efficiency: self.energy_efficiency.as_deref(),
            certification_count: self.certifications.len(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub renewable_percentage: Option<Decimal>,
    pub co2_reduction: Option<Decimal>,
    pub energy_efficiency: Option<String>,
    pub certifications: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub product_type: ProductType,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub min_investment: Decimal,
    /// Percent per year.
    pub annual_yield: Decimal,
    pub renewable_percentage: Decimal,
    pub co2_reduction: Decimal,
    pub energy_efficiency: Option<String>,
    pub certifications: Vec<String>,
    pub sustainability_score: Decimal,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    pub fn compute_score(&self) -> Decimal {
        sustainability_score(SustainabilityInputs {
            renewable_percentage: self.renewable_percentage,
            co2_reduction: self.co2_reduction,
            energy_efficiency: self.energy_efficiency.as_deref(),
            certification_count: self.certifications.len(),
        })
    }

    pub fn apply(&mut self, update: ProductUpdate) {
        if let Some(v) = update.provider_id {
            self.provider_id = v;
        }
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.product_type {
            self.product_type = v;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if let Some(v) = update.unit_price {
            self.unit_price = v;
        }
        if let Some(v) = update.min_investment {
            self.min_investment = v;
        }
        if let Some(v) = update.annual_yield {
            self.annual_yield = v;
        }
        if let Some(v) = update.renewable_percentage {
            self.renewable_percentage = v;
        }
        if let Some(v) = update.co2_reduction {
            self.co2_reduction = v;
        }
        if update.energy_efficiency.is_some() {
            self.energy_efficiency = update.energy_efficiency;
        }
        if let Some(certs) = update.certifications {
            self.certifications = certs;
        }
        if let Some(active) = update.is_active {
            self.is_active = active;
        }
        self.sustainability_score = self.compute_score();
    }

    /// Full validation of a product after an update has been applied.
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("provider_id", &self.provider_id);
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.amount("unit_price", self.unit_price);
        v.non_negative("min_investment", self.min_investment);
        v.between("annual_yield", self.annual_yield, Decimal::ZERO, dec!(100));
        validate_sustainability(
            &mut v,
            self.renewable_percentage,
            self.co2_reduction,
            self.energy_efficiency.as_deref(),
        );
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub provider_id: String,
    pub name: String,
    pub product_type: ProductType,
    pub description: Option<String>,
    pub unit_price: Decimal,
    #[serde(default)]
    pub min_investment: Decimal,
    #[serde(default)]
    pub annual_yield: Decimal,
    #[serde(default)]
    pub renewable_percentage: Decimal,
    #[serde(default)]
    pub co2_reduction: Decimal,
    pub energy_efficiency: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("provider_id", &self.provider_id);
        v.required("name", &self.name).max_len("name", &self.name, 255);
        v.amount("unit_price", self.unit_price);
        v.non_negative("min_investment", self.min_investment);
        v.between("annual_yield", self.annual_yield, Decimal::ZERO, dec!(100));
        validate_sustainability(
            &mut v,
            self.renewable_percentage,
            self.co2_reduction,
            self.energy_efficiency.as_deref(),
        );
        v.finish()
    }

    pub fn score(&self) -> Decimal {
        sustainability_score(SustainabilityInputs {
            renewable_percentage: self.renewable_percentage,
            co2_reduction: self.co2_reduction,
            energy_efficiency: self.energy_efficiency.as_deref(),
            certification_count: self.certifications.len(),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub provider_id: Option<String>,
    pub name: Option<String>,
    pub product_type: Option<ProductType>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub min_investment: Option<Decimal>,
    pub annual_yield: Option<Decimal>,
    pub renewable_percentage: Option<Decimal>,
    pub co2_reduction: Option<Decimal>,
    pub energy_efficiency: Option<String>,
    pub certifications: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    pub provider_id: Option<String>,
    pub product_type: Option<ProductType>,
    pub is_active: Option<bool>,
    pub min_score: Option<Decimal>,
    pub search: Option<String>,
}

/// Price quote for buying `quantity` units of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuote {
    pub product_id: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub min_investment: Decimal,
    pub meets_minimum: bool,
    pub daily_yield: Decimal,
    pub estimated_annual_return: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            id: "product-1".to_string(),
            provider_id: "provider-1".to_string(),
            name: "Rooftop Solar Share".to_string(),
            product_type: ProductType::Solar,
            description: None,
            unit_price: dec!(50),
            min_investment: dec!(100),
            annual_yield: dec!(5.5),
            renewable_percentage: dec!(100),
            co2_reduction: dec!(0),
            energy_efficiency: None,
            certifications: vec![],
            sustainability_score: dec!(40),
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_apply_recomputes_score() {
        let mut p = product();
        p.apply(ProductUpdate {
            energy_efficiency: Some("A".to_string()),
            certifications: Some(vec!["ISO 14001".to_string()]),
            ..Default::default()
        });
        // 40 + 0.2*70 + 0.1*20
        assert_eq!(p.sustainability_score, dec!(56));
    }

    #[test]
    fn test_invalid_grade_is_rejected() {
        let mut p = product();
        p.energy_efficiency = Some("AAA".to_string());
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_product_type_parsing() {
        assert_eq!("wind".parse::<ProductType>().unwrap(), ProductType::Wind);
        assert!("nuclear".parse::<ProductType>().is_err());
    }
}
