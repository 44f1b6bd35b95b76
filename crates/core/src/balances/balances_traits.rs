//! Ledger repository and service traits.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::analytics::{AnalyticsPeriod, BalanceAnalytics};
use super::balances_model::{
    Balance, BalanceFilter, BalanceSummary, CashMovementRequest, NewBalanceEntry,
    NewBalanceRequest, YieldCreditRequest,
};
use crate::access::Actor;
use crate::errors::Result;
use crate::pagination::{PageRequest, Paginated};

/// Persistence contract for ledger entries.
///
/// Entries are append-only. The only mutation is `complete`.
#[async_trait]
pub trait BalanceRepositoryTrait: Send + Sync {
    fn get_by_id(&self, entry_id: &str) -> Result<Balance>;

    /// Filtered page of entries, newest first.
    fn list(&self, filter: &BalanceFilter, page: PageRequest) -> Result<Paginated<Balance>>;

    /// Every entry of one user, oldest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Balance>>;

    /// Appends a credit without any balance check.
    async fn append(&self, entry: NewBalanceEntry) -> Result<Balance>;

    /// Appends a debit. The available balance is read and checked inside the
    /// same write transaction as the insert, failing with
    /// `Error::InsufficientFunds` when the debit's magnitude exceeds it.
    async fn append_debit(&self, entry: NewBalanceEntry) -> Result<Balance>;

    /// Moves a pending entry to completed.
    async fn complete(&self, entry_id: &str) -> Result<Balance>;
}

#[async_trait]
pub trait BalanceServiceTrait: Send + Sync {
    fn get_entry(&self, actor: &Actor, entry_id: &str) -> Result<Balance>;

    fn list_entries(
        &self,
        actor: &Actor,
        filter: BalanceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Balance>>;

    /// Balances of `user_id`, or of the caller when `None`.
    fn summary(&self, actor: &Actor, user_id: Option<&str>) -> Result<BalanceSummary>;

    fn analytics(
        &self,
        actor: &Actor,
        user_id: Option<&str>,
        period: AnalyticsPeriod,
    ) -> Result<BalanceAnalytics>;

    async fn record_deposit(&self, actor: &Actor, request: CashMovementRequest) -> Result<Balance>;

    async fn record_withdrawal(
        &self,
        actor: &Actor,
        request: CashMovementRequest,
    ) -> Result<Balance>;

    async fn record_investment(
        &self,
        user_id: &str,
        amount: Decimal,
        product_id: &str,
        user_asset_id: Option<&str>,
        description: Option<String>,
    ) -> Result<Balance>;

    async fn record_yield(&self, actor: &Actor, request: YieldCreditRequest) -> Result<Balance>;

    async fn create_entry(&self, actor: &Actor, request: NewBalanceRequest) -> Result<Balance>;

    async fn complete_entry(&self, actor: &Actor, entry_id: &str) -> Result<Balance>;
}
