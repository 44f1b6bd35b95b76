//! Position valuation: daily yield, ROI and portfolio aggregation.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use super::user_assets_model::{
    AssetPerformance, PortfolioSummary, TypeAllocation, UserAsset, YieldResult,
};
use crate::catalog::{Product, ProductType};
use crate::constants::{DAYS_PER_YEAR, MONEY_PRECISION, RATE_PRECISION, TOP_PERFORMERS_LIMIT};
use crate::errors::{Error, Result};

/// Annual percentage turned into a daily one, rounded to 6 dp.
pub fn daily_yield_rate(annual_yield: Decimal) -> Decimal {
    (annual_yield / Decimal::from(DAYS_PER_YEAR)).round_dp(RATE_PRECISION)
}

/// Return on investment in percent; 0 when nothing was invested.
pub fn roi(current_value: Decimal, total_investment: Decimal) -> Decimal {
    if total_investment.is_zero() {
        return Decimal::ZERO;
    }
    ((current_value - total_investment) / total_investment * dec!(100)).round_dp(RATE_PRECISION)
}

/// Applies one day of yield to an active position.
///
/// The yield is added to `current_value` whatever `auto_reinvest` says; the
/// flag only reports whether the gain compounds into the next run.
/// `total_investment` is never touched.
pub fn process_yield(asset: &mut UserAsset, at: NaiveDateTime) -> Result<YieldResult> {
    if !asset.is_active() {
        return Err(Error::ConstraintViolation(format!(
            "Position '{}' is inactive",
            asset.id
        )));
    }
    let old_value = asset.current_value;
    let yield_amount = old_value * asset.daily_yield / dec!(100);
    asset.current_value = old_value + yield_amount;
    asset.last_yield_at = Some(at);
    asset.updated_at = at;
    Ok(YieldResult {
        asset_id: asset.id.clone(),
        old_value,
        new_value: asset.current_value,
        yield_amount,
        reinvested: asset.auto_reinvest,
    })
}

/// Aggregates a user's active positions with their products.
pub fn summarize_portfolio(user_id: &str, holdings: &[(UserAsset, Product)]) -> PortfolioSummary {
    let active: Vec<&(UserAsset, Product)> =
        holdings.iter().filter(|(asset, _)| asset.is_active()).collect();

    let total_investment: Decimal = active.iter().map(|(a, _)| a.total_investment).sum();
    let current_value: Decimal = active.iter().map(|(a, _)| a.current_value).sum();

    let mut by_type: BTreeMap<ProductType, (Decimal, Decimal)> = BTreeMap::new();
    for (asset, product) in &active {
        let slot = by_type
            .entry(product.product_type)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        slot.0 += asset.total_investment;
        slot.1 += asset.current_value;
    }
    let distribution = by_type
        .into_iter()
        .map(|(product_type, (invested, value))| TypeAllocation {
            product_type,
            invested: invested.round_dp(MONEY_PRECISION),
            value: value.round_dp(MONEY_PRECISION),
            share: if current_value.is_zero() {
                Decimal::ZERO
            } else {
                (value / current_value * dec!(100)).round_dp(MONEY_PRECISION)
            },
        })
        .collect();

    let mut performers: Vec<AssetPerformance> = active
        .iter()
        .map(|(asset, product)| AssetPerformance {
            asset_id: asset.id.clone(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            current_value: asset.current_value.round_dp(MONEY_PRECISION),
            roi: asset.roi().round_dp(MONEY_PRECISION),
        })
        .collect();
    performers.sort_by(|a, b| {
        b.roi
            .cmp(&a.roi)
            .then_with(|| a.asset_id.cmp(&b.asset_id))
    });
    performers.truncate(TOP_PERFORMERS_LIMIT);

    PortfolioSummary {
        user_id: user_id.to_string(),
        asset_count: active.len(),
        total_investment: total_investment.round_dp(MONEY_PRECISION),
        current_value: current_value.round_dp(MONEY_PRECISION),
        total_yield: (current_value - total_investment).round_dp(MONEY_PRECISION),
        roi: roi(current_value, total_investment).round_dp(MONEY_PRECISION),
        distribution,
        top_performers: performers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_assets::AssetStatus;

    fn asset(id: &str, invested: Decimal, value: Decimal, status: AssetStatus) -> UserAsset {
        UserAsset {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            product_id: format!("product-{}", id),
            quantity: dec!(1),
            total_investment: invested,
            current_value: value,
            daily_yield: dec!(0.02),
            auto_reinvest: false,
            status,
            last_yield_at: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn product(id: &str, product_type: ProductType) -> Product {
        Product {
            id: format!("product-{}", id),
            provider_id: "provider-1".to_string(),
            name: format!("Product {}", id),
            product_type,
            description: None,
            unit_price: dec!(1),
            min_investment: Decimal::ZERO,
            annual_yield: dec!(7.3),
            renewable_percentage: dec!(100),
            co2_reduction: Decimal::ZERO,
            energy_efficiency: None,
            certifications: Vec::new(),
            sustainability_score: dec!(40),
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_daily_yield_rate_rounds_to_six_places() {
        assert_eq!(daily_yield_rate(dec!(7.3)), dec!(0.02));
        assert_eq!(daily_yield_rate(dec!(5)), dec!(0.013699));
    }

    #[test]
    fn test_roi() {
        assert_eq!(roi(dec!(110), dec!(100)), dec!(10));
        assert_eq!(roi(dec!(90), dec!(100)), dec!(-10));
        assert_eq!(roi(dec!(50), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_process_yield_grows_value_only() {
        let mut position = asset("a", dec!(1000), dec!(1000), AssetStatus::Active);
        let result = process_yield(&mut position, NaiveDateTime::default()).unwrap();

        assert_eq!(result.yield_amount, dec!(0.2));
        assert_eq!(result.new_value, dec!(1000.2));
        assert!(!result.reinvested);
        assert_eq!(position.current_value, dec!(1000.2));
        assert_eq!(position.total_investment, dec!(1000));
        assert!(position.last_yield_at.is_some());
    }

    #[test]
    fn test_process_yield_rejects_inactive_positions() {
        let mut position = asset("a", dec!(1000), dec!(1000), AssetStatus::Inactive);
        assert!(matches!(
            process_yield(&mut position, NaiveDateTime::default()),
            Err(Error::ConstraintViolation(_))
        ));
        assert_eq!(position.current_value, dec!(1000));
    }

    #[test]
    fn test_summary_distribution_and_top_performers() {
        let holdings = vec![
            (asset("a", dec!(100), dec!(150), AssetStatus::Active), product("a", ProductType::Solar)),
            (asset("b", dec!(100), dec!(110), AssetStatus::Active), product("b", ProductType::Solar)),
            (asset("c", dec!(200), dec!(240), AssetStatus::Active), product("c", ProductType::Wind)),
            (asset("d", dec!(999), dec!(0), AssetStatus::Inactive), product("d", ProductType::Hydro)),
        ];

        let summary = summarize_portfolio("user-1", &holdings);

        assert_eq!(summary.asset_count, 3);
        assert_eq!(summary.total_investment, dec!(400));
        assert_eq!(summary.current_value, dec!(500));
        assert_eq!(summary.total_yield, dec!(100));
        assert_eq!(summary.roi, dec!(25));
        assert_eq!(summary.distribution.len(), 2);
        assert_eq!(summary.distribution[0].product_type, ProductType::Solar);
        assert_eq!(summary.distribution[0].share, dec!(52));
        let order: Vec<&str> = summary
            .top_performers
            .iter()
            .map(|p| p.asset_id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }
}
