use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::analytics::{compute_analytics, AnalyticsPeriod, BalanceAnalytics};
use super::balances_model::{
    Balance, BalanceFilter, BalanceStatus, BalanceSummary, CashMovementRequest,
    NewBalanceRequest, TransactionType, YieldCreditRequest,
};
use super::balances_traits::{BalanceRepositoryTrait, BalanceServiceTrait};
use super::ledger;
use crate::access::{Actor, Role};
use crate::errors::{Error, Result, ValidationError};
use crate::pagination::{PageRequest, Paginated};

/// Ledger service. Amount signs and statuses are decided here; sufficiency
/// checks are delegated to the repository so they share the insert's
/// transaction.
pub struct BalanceService {
    repository: Arc<dyn BalanceRepositoryTrait>,
}

impl BalanceService {
    pub fn new(repository: Arc<dyn BalanceRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn target_user<'a>(actor: &'a Actor, user_id: Option<&'a str>) -> Result<&'a str> {
        match user_id {
            Some(id) => {
                actor.require_owner_or(id, Role::Admin)?;
                Ok(id)
            }
            None => Ok(actor.user_id.as_str()),
        }
    }

    async fn withdraw_for(
        &self,
        user_id: &str,
        amount: Decimal,
        description: Option<String>,
        payment_method: Option<String>,
    ) -> Result<Balance> {
        let entry = ledger::withdrawal_entry(user_id, amount, description, payment_method);
        let created = self.repository.append_debit(entry).await?;
        info!("Recorded pending withdrawal {} for user {}", created.id, user_id);
        Ok(created)
    }

    async fn credit_yield(
        &self,
        user_id: &str,
        amount: Decimal,
        user_asset_id: Option<String>,
        description: Option<String>,
    ) -> Result<Balance> {
        let entry = ledger::yield_entry(user_id, amount, user_asset_id, description);
        self.repository.append(entry).await
    }
}

#[async_trait]
impl BalanceServiceTrait for BalanceService {
    fn get_entry(&self, actor: &Actor, entry_id: &str) -> Result<Balance> {
        let entry = self.repository.get_by_id(entry_id)?;
        actor.require_owner_or(&entry.user_id, Role::Admin)?;
        Ok(entry)
    }

    fn list_entries(
        &self,
        actor: &Actor,
        mut filter: BalanceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Balance>> {
        filter.validate()?;
        if !actor.has_role(Role::Admin) {
            filter.user_id = Some(actor.user_id.clone());
        }
        self.repository.list(&filter, page)
    }

    fn summary(&self, actor: &Actor, user_id: Option<&str>) -> Result<BalanceSummary> {
        let user_id = Self::target_user(actor, user_id)?;
        let entries = self.repository.list_for_user(user_id)?;
        ledger::summarize(user_id, &entries)
    }

    fn analytics(
        &self,
        actor: &Actor,
        user_id: Option<&str>,
        period: AnalyticsPeriod,
    ) -> Result<BalanceAnalytics> {
        let user_id = Self::target_user(actor, user_id)?;
        let entries = self.repository.list_for_user(user_id)?;
        debug!(
            "Computing {:?} analytics for user {} over {} entries",
            period,
            user_id,
            entries.len()
        );
        Ok(compute_analytics(&entries, period, Utc::now().naive_utc()))
    }

    async fn record_deposit(&self, actor: &Actor, request: CashMovementRequest) -> Result<Balance> {
        request.validate()?;
        let entry = ledger::deposit_entry(
            &actor.user_id,
            request.amount,
            request.description,
            request.payment_method,
        );
        let created = self.repository.append(entry).await?;
        info!("Recorded deposit {} for user {}", created.id, actor.user_id);
        Ok(created)
    }

    async fn record_withdrawal(
        &self,
        actor: &Actor,
        request: CashMovementRequest,
    ) -> Result<Balance> {
        request.validate()?;
        self.withdraw_for(
            &actor.user_id,
            request.amount,
            request.description,
            request.payment_method,
        )
        .await
    }

    async fn record_investment(
        &self,
        user_id: &str,
        amount: Decimal,
        product_id: &str,
        user_asset_id: Option<&str>,
        description: Option<String>,
    ) -> Result<Balance> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(
                "Investment amount must be greater than 0".to_string(),
            )
            .into());
        }
        let entry = ledger::investment_entry(user_id, amount, product_id, user_asset_id, description);
        self.repository.append_debit(entry).await
    }

    async fn record_yield(&self, actor: &Actor, request: YieldCreditRequest) -> Result<Balance> {
        actor.require(Role::Admin)?;
        request.validate()?;
        self.credit_yield(
            &request.user_id,
            request.amount,
            request.user_asset_id,
            request.description,
        )
        .await
    }

    async fn create_entry(&self, actor: &Actor, request: NewBalanceRequest) -> Result<Balance> {
        actor.require(Role::Admin)?;
        request.validate()?;
        match request.transaction_type {
            TransactionType::Deposit => {
                let entry = ledger::deposit_entry(
                    &request.user_id,
                    request.amount,
                    request.description,
                    request.payment_method,
                );
                self.repository.append(entry).await
            }
            TransactionType::Withdrawal => {
                self.withdraw_for(
                    &request.user_id,
                    request.amount,
                    request.description,
                    request.payment_method,
                )
                .await
            }
            TransactionType::Investment => {
                let product_id = request.product_id.unwrap_or_default();
                self.record_investment(
                    &request.user_id,
                    request.amount,
                    &product_id,
                    request.user_asset_id.as_deref(),
                    request.description,
                )
                .await
            }
            TransactionType::Yield => {
                self.credit_yield(
                    &request.user_id,
                    request.amount,
                    request.user_asset_id,
                    request.description,
                )
                .await
            }
        }
    }

    async fn complete_entry(&self, actor: &Actor, entry_id: &str) -> Result<Balance> {
        actor.require(Role::Admin)?;
        let entry = self.repository.get_by_id(entry_id)?;
        if entry.status == BalanceStatus::Completed {
            return Err(Error::ConstraintViolation(format!(
                "Balance entry '{}' is already completed",
                entry_id
            )));
        }
        let completed = self.repository.complete(entry_id).await?;
        info!("Completed balance entry {}", entry_id);
        Ok(completed)
    }
}
