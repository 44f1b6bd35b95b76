//! Portfolio position domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::ProductType;
use crate::errors::{Error, Result, ValidationError};
use crate::validation::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active,
    Inactive,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "active",
            AssetStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(AssetStatus::Active),
            "inactive" => Ok(AssetStatus::Inactive),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown asset status '{}'",
                other
            )))),
        }
    }
}

/// A user's holding of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAsset {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: Decimal,
    /// Capital put in; changes only when the user invests.
    pub total_investment: Decimal,
    /// Valuation; grows with every processed yield.
    pub current_value: Decimal,
    /// Percent per day.
    pub daily_yield: Decimal,
    pub auto_reinvest: bool,
    pub status: AssetStatus,
    pub last_yield_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserAsset {
    pub fn is_active(&self) -> bool {
        self.status == AssetStatus::Active
    }

    pub fn roi(&self) -> Decimal {
        super::valuation::roi(self.current_value, self.total_investment)
    }
}

/// Body of `POST /user-assets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenPositionRequest {
    pub product_id: String,
    pub quantity: Decimal,
    #[serde(default)]
    pub auto_reinvest: bool,
    /// Staff may open a position on behalf of another user.
    pub user_id: Option<String>,
}

impl OpenPositionRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("product_id", &self.product_id);
        v.amount("quantity", self.quantity);
        v.finish()
    }
}

/// A position ready to be stored, with its amounts already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserAsset {
    pub user_id: String,
    pub product_id: String,
    pub quantity: Decimal,
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub daily_yield: Decimal,
    pub auto_reinvest: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAssetUpdate {
    pub auto_reinvest: Option<bool>,
    pub status: Option<AssetStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAssetFilter {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub status: Option<AssetStatus>,
}

/// Outcome of one yield run on a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldResult {
    pub asset_id: String,
    pub old_value: Decimal,
    pub new_value: Decimal,
    pub yield_amount: Decimal,
    pub reinvested: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAllocation {
    pub product_type: ProductType,
    pub invested: Decimal,
    pub value: Decimal,
    /// Share of the portfolio's current value, in percent.
    pub share: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    pub asset_id: String,
    pub product_id: String,
    pub product_name: String,
    pub current_value: Decimal,
    pub roi: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub user_id: String,
    pub asset_count: usize,
    pub total_investment: Decimal,
    pub current_value: Decimal,
    pub total_yield: Decimal,
    pub roi: Decimal,
    pub distribution: Vec<TypeAllocation>,
    pub top_performers: Vec<AssetPerformance>,
}
