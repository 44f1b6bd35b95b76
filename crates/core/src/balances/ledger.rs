//! Ledger arithmetic. Balances are never stored; they are folded from entries.

use rust_decimal::Decimal;

use super::balances_model::{
    Balance, BalanceStatus, BalanceSummary, NewBalanceEntry, TransactionType,
};
use crate::constants::MONEY_PRECISION;
use crate::errors::{Error, Result};

/// Adds up signed amounts, failing instead of overflowing.
fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total
            .checked_add(amount)
            .ok_or_else(|| Error::Calculation("Balance total is out of range".to_string()))
    })
}

/// Sum of completed entries' signed amounts.
pub fn current_balance<'a>(entries: impl IntoIterator<Item = &'a Balance>) -> Result<Decimal> {
    checked_sum(
        entries
            .into_iter()
            .filter(|e| e.status == BalanceStatus::Completed)
            .map(|e| e.amount),
    )
}

/// Sum of pending entries' signed amounts.
pub fn pending_balance<'a>(entries: impl IntoIterator<Item = &'a Balance>) -> Result<Decimal> {
    checked_sum(
        entries
            .into_iter()
            .filter(|e| e.status == BalanceStatus::Pending)
            .map(|e| e.amount),
    )
}

/// Current balance minus the magnitude of pending debits.
pub fn available_balance(current: Decimal, pending_debits: Decimal) -> Result<Decimal> {
    current
        .checked_sub(pending_debits.abs())
        .ok_or_else(|| Error::Calculation("Available balance is out of range".to_string()))
}

/// Folds a user's entries into the three derived balances.
pub fn summarize(user_id: &str, entries: &[Balance]) -> Result<BalanceSummary> {
    let current = current_balance(entries)?;
    let pending = pending_balance(entries)?;
    let pending_debits = checked_sum(
        entries
            .iter()
            .filter(|e| e.status == BalanceStatus::Pending && e.amount < Decimal::ZERO)
            .map(|e| e.amount),
    )?;
    Ok(BalanceSummary {
        user_id: user_id.to_string(),
        current_balance: current,
        pending_balance: pending,
        available_balance: available_balance(current, pending_debits)?,
    })
}

/// Price of `quantity` units at `unit_price`, rounded to money precision.
pub fn investment_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal> {
    quantity
        .checked_mul(unit_price)
        .map(|total| total.round_dp(MONEY_PRECISION))
        .ok_or_else(|| Error::Calculation("Investment total is out of range".to_string()))
}

/// Debits may take the balance to exactly zero, never below.
pub fn ensure_sufficient_funds(available: Decimal, requested: Decimal) -> Result<()> {
    if requested > available {
        Err(Error::InsufficientFunds {
            requested,
            available,
        })
    } else {
        Ok(())
    }
}

pub fn deposit_entry(
    user_id: &str,
    amount: Decimal,
    description: Option<String>,
    payment_method: Option<String>,
) -> NewBalanceEntry {
    NewBalanceEntry {
        user_id: user_id.to_string(),
        amount: amount.abs(),
        transaction_type: TransactionType::Deposit,
        status: BalanceStatus::Completed,
        description,
        payment_method,
        product_id: None,
        user_asset_id: None,
    }
}

/// Withdrawals stay pending until an administrator settles them.
pub fn withdrawal_entry(
    user_id: &str,
    amount: Decimal,
    description: Option<String>,
    payment_method: Option<String>,
) -> NewBalanceEntry {
    NewBalanceEntry {
        user_id: user_id.to_string(),
        amount: -amount.abs(),
        transaction_type: TransactionType::Withdrawal,
        status: BalanceStatus::Pending,
        description,
        payment_method,
        product_id: None,
        user_asset_id: None,
    }
}

pub fn investment_entry(
    user_id: &str,
    amount: Decimal,
    product_id: &str,
    user_asset_id: Option<&str>,
    description: Option<String>,
) -> NewBalanceEntry {
    NewBalanceEntry {
        user_id: user_id.to_string(),
        amount: -amount.abs(),
        transaction_type: TransactionType::Investment,
        status: BalanceStatus::Completed,
        description,
        payment_method: None,
        product_id: Some(product_id.to_string()),
        user_asset_id: user_asset_id.map(str::to_string),
    }
}

pub fn yield_entry(
    user_id: &str,
    amount: Decimal,
    user_asset_id: Option<String>,
    description: Option<String>,
) -> NewBalanceEntry {
    NewBalanceEntry {
        user_id: user_id.to_string(),
        amount: amount.abs(),
        transaction_type: TransactionType::Yield,
        status: BalanceStatus::Completed,
        description,
        payment_method: None,
        product_id: None,
        user_asset_id,
    }
}
