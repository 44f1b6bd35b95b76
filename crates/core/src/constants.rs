use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Upper bound accepted for any amount, quantity, price or kWh figure.
/// Sums and products of bounded inputs stay well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Decimal precision for monetary values returned to clients
pub const MONEY_PRECISION: u32 = 2;

/// Decimal precision for rates (daily yield, ROI) kept during calculations
pub const RATE_PRECISION: u32 = 6;

/// Days used to turn an annual yield percentage into a daily one
pub const DAYS_PER_YEAR: u32 = 365;

/// Number of positions reported as top performers in a portfolio summary
pub const TOP_PERFORMERS_LIMIT: usize = 5;

/// Default page size when the client does not send `per_page`
pub const DEFAULT_PER_PAGE: i64 = 15;

/// Per-resource page size caps
pub mod per_page_caps {
    pub const BALANCES: i64 = 50;
    pub const USER_ASSETS: i64 = 30;
    pub const CATALOG: i64 = 30;
    pub const USERS: i64 = 25;
    pub const ORGANIZATIONS: i64 = 25;
    pub const GAMIFICATION: i64 = 30;
    pub const CONTENT: i64 = 20;
    pub const CONTACTS: i64 = 25;
    pub const GEOGRAPHY: i64 = 50;
}
