//! Database model for ledger entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use energycoop_core::balances::{Balance, NewBalanceEntry};
use energycoop_core::errors::Error;

use crate::utils::{decimal_to_text, new_id, parse_decimal_strict, parse_enum_strict};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BalanceDB {
    pub id: String,
    pub user_id: String,
    pub amount: String,
    pub transaction_type: String,
    pub status: String,
    pub description: Option<String>,
    pub payment_method: Option<String>,
    pub product_id: Option<String>,
    pub user_asset_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Ledger rows are read strictly: a corrupt amount, type or status fails the
/// read instead of silently changing the user's balance.
impl TryFrom<BalanceDB> for Balance {
    type Error = Error;

    fn try_from(db: BalanceDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: parse_decimal_strict(&db.amount, "balances.amount")?,
            transaction_type: parse_enum_strict(
                &db.transaction_type,
                "balances.transaction_type",
            )?,
            status: parse_enum_strict(&db.status, "balances.status")?,
            id: db.id,
            user_id: db.user_id,
            description: db.description,
            payment_method: db.payment_method,
            product_id: db.product_id,
            user_asset_id: db.user_asset_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewBalanceEntry> for BalanceDB {
    fn from(entry: NewBalanceEntry) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_id(),
            user_id: entry.user_id,
            amount: decimal_to_text(entry.amount),
            transaction_type: entry.transaction_type.as_str().to_string(),
            status: entry.status.as_str().to_string(),
            description: entry.description,
            payment_method: entry.payment_method,
            product_id: entry.product_id,
            user_asset_id: entry.user_asset_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use energycoop_core::balances::{BalanceStatus, TransactionType};
    use rust_decimal_macros::dec;

    fn row(amount: &str, status: &str) -> BalanceDB {
        BalanceDB {
            id: "entry-1".to_string(),
            user_id: "user-1".to_string(),
            amount: amount.to_string(),
            transaction_type: "withdrawal".to_string(),
            status: status.to_string(),
            description: None,
            payment_method: None,
            product_id: None,
            user_asset_id: None,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_valid_row_converts() {
        let entry = Balance::try_from(row("-25.5", "pending")).unwrap();
        assert_eq!(entry.amount, dec!(-25.5));
        assert_eq!(entry.transaction_type, TransactionType::Withdrawal);
        assert_eq!(entry.status, BalanceStatus::Pending);
    }

    #[test]
    fn test_corrupt_amount_is_not_read_as_zero() {
        assert!(matches!(
            Balance::try_from(row("12,50", "completed")),
            Err(Error::Unexpected(_))
        ));
        assert!(matches!(
            Balance::try_from(row("12.50", "settled")),
            Err(Error::Unexpected(_))
        ));
    }
}
