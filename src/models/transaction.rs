//! Transaction listing models

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Query string accepted by `GET /api/transactions`, as sent by the client
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
    #[serde(rename = "s")]
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sort")]
    pub sort_order: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

/// `?page=` counts as absent; anything else must be an integer
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Column a listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Date,
    Amount,
    Recipient,
}

impl SortBy {
    /// Unknown or empty values fall back to `Date`
    pub fn parse(value: &str) -> Self {
        match value {
            "amount" => SortBy::Amount,
            "recipient" => SortBy::Recipient,
            _ => SortBy::Date,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortBy::Date => "t.created_at",
            SortBy::Amount => "t.amount",
            SortBy::Recipient => "u.username",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only `asc` (any case) sorts ascending, everything else is descending.
    /// Surrounding whitespace is not stripped, so `" asc"` is descending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized listing constraints for one caller
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    pub user_id: i64,
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TransactionFilter {
    /// Filter with every optional constraint unset
    pub fn for_user(user_id: i64) -> Self {
        TransactionFilter {
            user_id,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            start_date: None,
            end_date: None,
        }
    }

    /// Number of rows skipped before the requested page
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Inclusive lower bound: midnight UTC of the start date
    pub fn created_from(&self) -> Option<DateTime<Utc>> {
        self.start_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    /// Exclusive upper bound: midnight UTC of the day after the end date
    pub fn created_before(&self) -> Option<DateTime<Utc>> {
        self.end_date
            .and_then(|date| date.checked_add_days(Days::new(1)))
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// A transfer as seen by one of its parties
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_wallet_id: Option<i64>,
    pub to_wallet_id: i64,
    pub amount: f64,
    pub description: String,
    pub source_of_fund_id: i64,
    pub transaction_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_wallet_number: Option<String>,
    pub to_wallet_number: String,
    pub recipient_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

/// Body of a successful listing response
#[derive(Debug, Clone, Serialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub pagination: PaginationInfo,
}
