//! Ledger entry domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::validation::Validator;

/// Kind of ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Investment,
    Yield,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Investment => "investment",
            TransactionType::Yield => "yield",
        }
    }

    /// Debits are stored as negative amounts.
    pub fn is_debit(&self) -> bool {
        matches!(self, TransactionType::Withdrawal | TransactionType::Investment)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "investment" => Ok(TransactionType::Investment),
            "yield" => Ok(TransactionType::Yield),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction type '{}'",
                other
            )))),
        }
    }
}

/// Settlement state of a ledger entry. Only `Pending -> Completed` is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Pending,
    Completed,
}

impl BalanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Pending => "pending",
            BalanceStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BalanceStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(BalanceStatus::Pending),
            "completed" => Ok(BalanceStatus::Completed),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown balance status '{}'",
                other
            )))),
        }
    }
}

/// An append-only signed ledger entry owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub status: BalanceStatus,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub product_id: Option<String>,
    pub user_asset_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Balance {
    pub fn is_completed(&self) -> bool {
        self.status == BalanceStatus::Completed
    }
}

/// A ledger entry ready to be appended. Built by the service, never by clients,
/// so the sign of `amount` always matches `transaction_type`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBalanceEntry {
    pub user_id: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub status: BalanceStatus,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub product_id: Option<String>,
    pub user_asset_id: Option<String>,
}

impl NewBalanceEntry {
    /// Requested amount as a positive number regardless of direction.
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

/// Body of `POST /balances/deposit` and `POST /balances/withdraw`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashMovementRequest {
    pub amount: Decimal,
    pub description: Option<String>,
    pub payment_method: Option<String>,
}

pub const PAYMENT_METHODS: [&str; 3] = ["bank_transfer", "card", "direct_debit"];

impl CashMovementRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.amount("amount", self.amount);
        if let Some(description) = &self.description {
            v.max_len("description", description, 255);
        }
        if let Some(method) = &self.payment_method {
            v.one_of("payment_method", method, &PAYMENT_METHODS);
        }
        v.finish()
    }
}

/// Body of `POST /user-assets/{id}/invest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentRequest {
    pub amount: Decimal,
    pub description: Option<String>,
}

impl InvestmentRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.amount("amount", self.amount);
        if let Some(description) = &self.description {
            v.max_len("description", description, 255);
        }
        v.finish()
    }
}

/// Body of `POST /balances/yield` (admin credit of a position's yield).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldCreditRequest {
    pub user_id: String,
    pub amount: Decimal,
    pub user_asset_id: Option<String>,
    pub description: Option<String>,
}

impl YieldCreditRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("user_id", &self.user_id);
        v.amount("amount", self.amount);
        if let Some(description) = &self.description {
            v.max_len("description", description, 255);
        }
        v.finish()
    }
}

/// Body of `POST /balances`: an administrator records any kind of entry
/// on behalf of a user. Routed to the same rules as the dedicated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBalanceRequest {
    pub user_id: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub product_id: Option<String>,
    pub user_asset_id: Option<String>,
}

impl NewBalanceRequest {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.required("user_id", &self.user_id);
        v.amount("amount", self.amount);
        if let Some(description) = &self.description {
            v.max_len("description", description, 255);
        }
        if let Some(method) = &self.payment_method {
            v.one_of("payment_method", method, &PAYMENT_METHODS);
        }
        if self.transaction_type == TransactionType::Investment {
            v.check(
                self.product_id.as_deref().is_some_and(|p| !p.is_empty()),
                "product_id",
                "The product_id field is required for investments.",
            );
        }
        v.finish()
    }
}

/// List filter for ledger entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceFilter {
    pub user_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<BalanceStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
}

impl BalanceFilter {
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        if let (Some(from), Some(to)) = (self.from, self.to) {
            v.check(from <= to, "from", "The from date must be before the to date.");
        }
        v.finish()
    }
}

/// Derived balances of one user; nothing here is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub user_id: String,
    pub current_balance: Decimal,
    pub pending_balance: Decimal,
    pub available_balance: Decimal,
}
