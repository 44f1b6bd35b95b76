//! Read-only ledger analytics over a trailing window of completed entries.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::balances_model::{Balance, TransactionType};
use crate::constants::MONEY_PRECISION;
use crate::errors::{Error, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsPeriod {
    Month,
    Quarter,
    #[default]
    Year,
}

impl AnalyticsPeriod {
    pub fn days(&self) -> i64 {
        match self {
            AnalyticsPeriod::Month => 30,
            AnalyticsPeriod::Quarter => 90,
            AnalyticsPeriod::Year => 365,
        }
    }
}

impl FromStr for AnalyticsPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(AnalyticsPeriod::Month),
            "quarter" => Ok(AnalyticsPeriod::Quarter),
            "year" => Ok(AnalyticsPeriod::Year),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown analytics period '{}'",
                other
            )))),
        }
    }
}

/// Income and expenses of one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlow {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub transaction_type: TransactionType,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAnalytics {
    pub period: AnalyticsPeriod,
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_flow: Decimal,
    pub monthly: Vec<MonthlyFlow>,
    pub by_type: Vec<TypeBreakdown>,
    pub yield_growth_rate: Decimal,
    pub performance_score: Decimal,
}

/// Builds analytics from a user's entries. Entries outside
/// `[now - period, now]` and non-completed entries are ignored.
pub fn compute_analytics(
    entries: &[Balance],
    period: AnalyticsPeriod,
    now: NaiveDateTime,
) -> BalanceAnalytics {
    let from = now - Duration::days(period.days());
    let in_window: Vec<&Balance> = entries
        .iter()
        .filter(|e| e.is_completed() && e.created_at >= from && e.created_at <= now)
        .collect();

    let mut monthly: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    let mut by_type: BTreeMap<TransactionType, (Decimal, usize)> = BTreeMap::new();
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut yield_income = Decimal::ZERO;

    for entry in &in_window {
        let month = entry.created_at.format("%Y-%m").to_string();
        let bucket = monthly.entry(month).or_insert((Decimal::ZERO, Decimal::ZERO));
        if entry.amount >= Decimal::ZERO {
            bucket.0 += entry.amount;
            income += entry.amount;
        } else {
            bucket.1 += entry.amount.abs();
            expenses += entry.amount.abs();
        }
        if entry.transaction_type == TransactionType::Yield {
            yield_income += entry.amount;
        }
        let kind = by_type
            .entry(entry.transaction_type)
            .or_insert((Decimal::ZERO, 0));
        kind.0 += entry.amount;
        kind.1 += 1;
    }

    let net = income - expenses;
    let growth = yield_growth_rate(&in_window, from, now);

    BalanceAnalytics {
        period,
        from,
        to: now,
        total_income: income,
        total_expenses: expenses,
        net_flow: net,
        monthly: monthly
            .into_iter()
            .map(|(month, (income, expenses))| MonthlyFlow {
                month,
                income,
                expenses,
                net: income - expenses,
            })
            .collect(),
        by_type: by_type
            .into_iter()
            .map(|(transaction_type, (total, count))| TypeBreakdown {
                transaction_type,
                total,
                count,
            })
            .collect(),
        yield_growth_rate: growth.round_dp(MONEY_PRECISION),
        performance_score: performance_score(income, net, yield_income, growth),
    }
}

/// Percentage change of the average yield entry between the two halves of
/// the window. Zero when the first half has no yield.
pub fn yield_growth_rate(entries: &[&Balance], from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    let midpoint = from + (to - from) / 2;
    let (first, second): (Vec<Decimal>, Vec<Decimal>) = entries
        .iter()
        .filter(|e| e.transaction_type == TransactionType::Yield)
        .fold((Vec::new(), Vec::new()), |(mut first, mut second), e| {
            if e.created_at < midpoint {
                first.push(e.amount);
            } else {
                second.push(e.amount);
            }
            (first, second)
        });

    let first_avg = average(&first);
    if first_avg.is_zero() {
        return Decimal::ZERO;
    }
    (average(&second) - first_avg) / first_avg * dec!(100)
}

/// Heuristic score in `[0, 100]`.
pub fn performance_score(
    income: Decimal,
    net: Decimal,
    yield_income: Decimal,
    growth_rate: Decimal,
) -> Decimal {
    let unit = |v: Decimal| v.max(Decimal::ZERO).min(Decimal::ONE);
    let (savings_ratio, yield_share) = if income.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (unit(net / income), unit(yield_income / income))
    };
    let growth_factor = unit((growth_rate + dec!(100)) / dec!(200));

    (dec!(40) * savings_ratio + dec!(30) * yield_share + dec!(30) * growth_factor)
        .round_dp(MONEY_PRECISION)
}

fn average(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        Decimal::ZERO
    } else {
        values.iter().copied().sum::<Decimal>() / Decimal::from(values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::balances_model::BalanceStatus;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn entry(amount: Decimal, kind: TransactionType, when: NaiveDateTime) -> Balance {
        Balance {
            id: format!("{}-{}", kind, when),
            user_id: "user-1".to_string(),
            amount,
            transaction_type: kind,
            status: BalanceStatus::Completed,
            description: None,
            payment_method: None,
            product_id: None,
            user_asset_id: None,
            created_at: when,
            updated_at: when,
        }
    }

    #[test]
    fn test_period_parsing_and_default() {
        assert_eq!(AnalyticsPeriod::default(), AnalyticsPeriod::Year);
        assert_eq!("quarter".parse::<AnalyticsPeriod>().unwrap().days(), 90);
        assert!("decade".parse::<AnalyticsPeriod>().is_err());
    }

    #[test]
    fn test_groups_by_month_and_type() {
        let now = at(2024, 6, 30);
        let entries = vec![
            entry(dec!(1000), TransactionType::Deposit, at(2024, 5, 2)),
            entry(dec!(-200), TransactionType::Investment, at(2024, 5, 10)),
            entry(dec!(50), TransactionType::Yield, at(2024, 6, 1)),
            // outside the window
            entry(dec!(999), TransactionType::Deposit, at(2023, 1, 1)),
        ];

        let analytics = compute_analytics(&entries, AnalyticsPeriod::Quarter, now);

        assert_eq!(analytics.total_income, dec!(1050));
        assert_eq!(analytics.total_expenses, dec!(200));
        assert_eq!(analytics.net_flow, dec!(850));
        assert_eq!(analytics.monthly.len(), 2);
        assert_eq!(analytics.monthly[0].month, "2024-05");
        assert_eq!(analytics.monthly[0].net, dec!(800));
        assert_eq!(analytics.by_type.len(), 3);
    }

    #[test]
    fn test_yield_growth_between_halves() {
        let now = at(2024, 12, 31);
        let entries = vec![
            entry(dec!(10), TransactionType::Yield, at(2024, 2, 1)),
            entry(dec!(20), TransactionType::Yield, at(2024, 3, 1)),
            entry(dec!(30), TransactionType::Yield, at(2024, 11, 1)),
        ];
        let analytics = compute_analytics(&entries, AnalyticsPeriod::Year, now);
        // first half average 15, second half 30
        assert_eq!(analytics.yield_growth_rate, dec!(100));
    }

    #[test]
    fn test_growth_is_zero_without_early_yield() {
        let now = at(2024, 12, 31);
        let entries = vec![entry(dec!(30), TransactionType::Yield, at(2024, 11, 1))];
        let analytics = compute_analytics(&entries, AnalyticsPeriod::Year, now);
        assert_eq!(analytics.yield_growth_rate, Decimal::ZERO);
    }

    #[test]
    fn test_performance_score_bounds() {
        assert_eq!(
            performance_score(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            dec!(15)
        );
        assert_eq!(
            performance_score(dec!(100), dec!(100), dec!(100), dec!(500)),
            dec!(100)
        );
        assert_eq!(
            performance_score(dec!(100), dec!(-50), dec!(0), dec!(-300)),
            dec!(0)
        );
    }
}
