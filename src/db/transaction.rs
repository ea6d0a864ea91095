use std::time::Duration;

use sqlx::postgres::{PgPool, PgRow};
use sqlx::{PgConnection, Row};

use super::query::{QueryParam, TransactionQuery};
use crate::models::{Transaction, TransactionFilter};

/// SQLSTATE raised when a statement is cancelled by `statement_timeout`
const QUERY_CANCELED: &str = "57014";

/// How the count and the page are read relative to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadConsistency {
    /// Each statement sees its own snapshot; a concurrent write may land between them
    #[default]
    Independent,
    /// Both statements share one read-only repeatable-read snapshot
    Snapshot,
}

/// Bind every filter parameter to a query in placeholder order
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                QueryParam::Int(value) => query.bind(*value),
                QueryParam::Text(value) => query.bind(value.as_str()),
                QueryParam::Timestamp(value) => query.bind(*value),
            };
        }
        query
    }};
}

/// List one page of a user's transactions (as sender or recipient).
/// Returns: (transactions, total matching rows)
///
/// Both statements run in one transaction whose `statement_timeout` is
/// `deadline`, so the server stops working on them once it passes.
pub async fn list_user_transactions(
    pool: &PgPool,
    filter: &TransactionFilter,
    consistency: ReadConsistency,
    deadline: Duration,
) -> Result<(Vec<Transaction>, i64), sqlx::Error> {
    let query = TransactionQuery::from_filter(filter);

    let mut tx = pool.begin().await?;
    if consistency == ReadConsistency::Snapshot {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("SELECT set_config('statement_timeout', $1, true)")
        .bind(deadline.as_millis().max(1).to_string())
        .execute(&mut *tx)
        .await?;

    let page = fetch_page(&mut *tx, &query).await?;
    tx.commit().await?;
    Ok(page)
}

/// Whether the server cancelled the statement (deadline or explicit cancel)
pub fn is_query_cancelled(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == QUERY_CANCELED)
}

async fn fetch_page(
    conn: &mut PgConnection,
    query: &TransactionQuery,
) -> Result<(Vec<Transaction>, i64), sqlx::Error> {
    let count_sql = query.count_sql();
    let total_items: i64 =
        bind_params!(sqlx::query_scalar::<_, i64>(&count_sql), query.params())
            .fetch_one(&mut *conn)
            .await?;

    let data_sql = query.data_sql();
    let rows = bind_params!(sqlx::query(&data_sql), query.params())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&mut *conn)
        .await?;

    let transactions = rows
        .iter()
        .map(map_transaction)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((transactions, total_items))
}

/// A NULL source wallet means the transfer was funded from outside the system
fn map_transaction(row: &PgRow) -> Result<Transaction, sqlx::Error> {
    Ok(Transaction {
        id: row.try_get("id")?,
        from_wallet_id: row.try_get("from_wallet_id")?,
        to_wallet_id: row.try_get("to_wallet_id")?,
        amount: row.try_get("amount")?,
        description: row.try_get("description")?,
        source_of_fund_id: row.try_get("source_of_fund_id")?,
        transaction_type: row.try_get("transaction_type")?,
        created_at: row.try_get("created_at")?,
        from_wallet_number: row.try_get("from_wallet_number")?,
        to_wallet_number: row.try_get("to_wallet_number")?,
        recipient_name: row.try_get("recipient_name")?,
    })
}
