//! Ledger of signed balance entries and the balances derived from them.

pub mod analytics;
mod balances_model;
mod balances_service;
mod balances_traits;
pub mod ledger;


pub use analytics::{AnalyticsPeriod, BalanceAnalytics, MonthlyFlow, TypeBreakdown};
pub use balances_model::{
    Balance, BalanceFilter, BalanceStatus, BalanceSummary, CashMovementRequest,
    InvestmentRequest, NewBalanceEntry, NewBalanceRequest, TransactionType, YieldCreditRequest,
    PAYMENT_METHODS,
};
pub use balances_service::BalanceService;
pub use balances_traits::{BalanceRepositoryTrait, BalanceServiceTrait};
