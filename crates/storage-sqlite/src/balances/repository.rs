use async_trait::async_trait;
use chrono::{Duration, NaiveTime};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use energycoop_core::balances::{
    ledger, Balance, BalanceFilter, BalanceRepositoryTrait, BalanceStatus, NewBalanceEntry,
};
use energycoop_core::errors::{Error, Result};
use energycoop_core::pagination::{PageRequest, Paginated};

use super::model::BalanceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::balances;
use crate::utils::like_pattern;

/// Ledger entries stored in SQLite.
pub struct BalanceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl BalanceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn entries_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<Balance>> {
    let rows = balances::table
        .filter(balances::user_id.eq(user_id))
        .order((balances::created_at.asc(), balances::id.asc()))
        .select(BalanceDB::as_select())
        .load::<BalanceDB>(conn)
        .into_core()?;
    rows.into_iter().map(Balance::try_from).collect()
}

fn insert_entry(conn: &mut SqliteConnection, entry: NewBalanceEntry) -> Result<Balance> {
    let row: BalanceDB = entry.into();
    diesel::insert_into(balances::table)
        .values(&row)
        .execute(conn)
        .into_core()?;
    Balance::try_from(row)
}

/// Checks the user's available balance covers the debit, then inserts it.
/// Pending withdrawals already reserve their amount, so two debits can never
/// spend the same completed funds.
/// Must run inside a writer job so no other debit can interleave.
pub(crate) fn append_checked(conn: &mut SqliteConnection, entry: NewBalanceEntry) -> Result<Balance> {
    let entries = entries_for_user(conn, &entry.user_id)?;
    let summary = ledger::summarize(&entry.user_id, &entries)?;
    ledger::ensure_sufficient_funds(summary.available_balance, entry.magnitude())?;
    insert_entry(conn, entry)
}

#[async_trait]
impl BalanceRepositoryTrait for BalanceRepository {
    fn get_by_id(&self, entry_id: &str) -> Result<Balance> {
        let mut conn = get_connection(&self.pool)?;
        balances::table
            .find(entry_id)
            .select(BalanceDB::as_select())
            .first::<BalanceDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Balance::try_from)
            .transpose()?
            .ok_or_else(|| Error::not_found("Balance", entry_id))
    }

    fn list(&self, filter: &BalanceFilter, page: PageRequest) -> Result<Paginated<Balance>> {
        let mut conn = get_connection(&self.pool)?;

        let create_base_query = || {
            let mut query = balances::table.into_boxed();
            if let Some(ref user_id) = filter.user_id {
                query = query.filter(balances::user_id.eq(user_id.clone()));
            }
            if let Some(kind) = filter.transaction_type {
                query = query.filter(balances::transaction_type.eq(kind.as_str()));
            }
            if let Some(status) = filter.status {
                query = query.filter(balances::status.eq(status.as_str()));
            }
            if let Some(from) = filter.from {
                query = query.filter(balances::created_at.ge(from.and_time(NaiveTime::MIN)));
            }
            if let Some(to) = filter.to {
                let end = (to + Duration::days(1)).and_time(NaiveTime::MIN);
                query = query.filter(balances::created_at.lt(end));
            }
            if let Some(ref term) = filter.search {
                query = query.filter(balances::description.like(like_pattern(term)));
            }
            query
        };

        let total = create_base_query()
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()?;

        let rows = create_base_query()
            .select(BalanceDB::as_select())
            .order((balances::created_at.desc(), balances::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load::<BalanceDB>(&mut conn)
            .into_core()?;

        let items = rows
            .into_iter()
            .map(Balance::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Paginated::new(items, total, page))
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Balance>> {
        let mut conn = get_connection(&self.pool)?;
        entries_for_user(&mut conn, user_id)
    }

    async fn append(&self, entry: NewBalanceEntry) -> Result<Balance> {
        self.writer.exec(move |conn| insert_entry(conn, entry)).await
    }

    async fn append_debit(&self, entry: NewBalanceEntry) -> Result<Balance> {
        self.writer.exec(move |conn| append_checked(conn, entry)).await
    }

    async fn complete(&self, entry_id: &str) -> Result<Balance> {
        let entry_id = entry_id.to_string();
        self.writer
            .exec(move |conn| {
                let now = chrono::Utc::now().naive_utc();
                let updated = diesel::update(
                    balances::table
                        .find(&entry_id)
                        .filter(balances::status.eq(BalanceStatus::Pending.as_str())),
                )
                .set((
                    balances::status.eq(BalanceStatus::Completed.as_str()),
                    balances::updated_at.eq(now),
                ))
                .execute(conn)
                .into_core()?;
                if updated == 0 {
                    return Err(Error::ConstraintViolation(format!(
                        "Balance entry '{}' is not pending",
                        entry_id
                    )));
                }
                balances::table
                    .find(&entry_id)
                    .select(BalanceDB::as_select())
                    .first::<BalanceDB>(conn)
                    .into_core()
                    .and_then(Balance::try_from)
            })
            .await
    }
}
