use chrono::{DateTime, Utc};

use crate::models::TransactionFilter;

/// Shared FROM clause: the transfer, both wallets and the recipient's user row.
/// The sender wallet is a LEFT JOIN because top-ups have no source wallet.
const FROM_CLAUSE: &str = "FROM transactions t \
     LEFT JOIN wallets fw ON t.from_wallet_id = fw.id \
     JOIN wallets tw ON t.to_wallet_id = tw.id \
     JOIN users u ON tw.user_id = u.id";

const SELECT_COLUMNS: &str = "SELECT \
     CAST(t.id AS BIGINT) AS id, \
     CAST(t.from_wallet_id AS BIGINT) AS from_wallet_id, \
     CAST(t.to_wallet_id AS BIGINT) AS to_wallet_id, \
     CAST(t.amount AS DOUBLE PRECISION) AS amount, \
     t.description, \
     CAST(t.source_of_fund_id AS BIGINT) AS source_of_fund_id, \
     t.transaction_type, \
     CAST(t.created_at AS TIMESTAMPTZ) AS created_at, \
     fw.wallet_number AS from_wallet_number, \
     tw.wallet_number AS to_wallet_number, \
     u.username AS recipient_name";

/// A value bound to one `$n` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Count and page queries for one filter.
///
/// Predicates are accumulated together with their parameters so that the
/// n-th parameter always belongs to the fragment that introduced `$n`. Both
/// statements render the same WHERE clause from the same list.
#[derive(Debug, Clone)]
pub struct TransactionQuery {
    predicates: Vec<String>,
    params: Vec<QueryParam>,
    order_by: String,
    limit: i64,
    offset: i64,
}

impl TransactionQuery {
    pub fn from_filter(filter: &TransactionFilter) -> Self {
        let mut query = TransactionQuery {
            predicates: Vec::new(),
            params: Vec::new(),
            order_by: format!(
                "{col} {dir}, t.id {dir}",
                col = filter.sort_by.column(),
                dir = filter.sort_order.keyword()
            ),
            limit: filter.limit,
            offset: filter.offset(),
        };

        // Caller must be the sender or the recipient; always $1
        query.push(
            |n| format!("(fw.user_id = ${n} OR tw.user_id = ${n})"),
            QueryParam::Int(filter.user_id),
        );

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query.push(
                |n| format!("LOWER(t.description) LIKE LOWER(${n})"),
                QueryParam::Text(format!("%{}%", escape_like(search))),
            );
        }

        if let Some(from) = filter.created_from() {
            query.push(|n| format!("t.created_at >= ${n}"), QueryParam::Timestamp(from));
        }

        if let Some(before) = filter.created_before() {
            query.push(|n| format!("t.created_at < ${n}"), QueryParam::Timestamp(before));
        }

        query
    }

    fn push(&mut self, fragment: impl FnOnce(usize) -> String, param: QueryParam) {
        self.params.push(param);
        self.predicates.push(fragment(self.params.len()));
    }

    fn where_clause(&self) -> String {
        self.predicates.join(" AND ")
    }

    /// `SELECT COUNT(*)` over the filtered rows, bound with [`Self::params`]
    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) {} WHERE {}", FROM_CLAUSE, self.where_clause())
    }

    /// Page query, bound with [`Self::params`] followed by limit and offset
    pub fn data_sql(&self) -> String {
        let limit_index = self.params.len() + 1;
        format!(
            "{} {} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            SELECT_COLUMNS,
            FROM_CLAUSE,
            self.where_clause(),
            self.order_by,
            limit_index,
            limit_index + 1
        )
    }

    pub fn params(&self) -> &[QueryParam] {
        &self.params
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Escape LIKE wildcards so the search term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
