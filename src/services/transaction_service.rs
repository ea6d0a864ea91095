use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::PgPool;
use tracing::debug;

use crate::db;
use crate::db::transaction::ReadConsistency;
use crate::models::{
    ListTransactionsQuery, PaginationInfo, SortBy, SortOrder, TransactionFilter,
    TransactionListResponse, DEFAULT_LIMIT, DEFAULT_PAGE,
};
use crate::utils::ListingError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const INVALID_START_DATE: &str = "Invalid start date format. Use YYYY-MM-DD";
const INVALID_END_DATE: &str = "Invalid end date format. Use YYYY-MM-DD";

/// Settings the listing needs from the process configuration
#[derive(Debug, Clone, Copy)]
pub struct ListingOptions {
    pub max_page_size: i64,
    pub timeout: Duration,
    pub consistency: ReadConsistency,
}

/// Validate and normalize raw query parameters into a filter.
///
/// Dates must be `YYYY-MM-DD`; `page`/`limit` below 1 fall back to defaults and
/// `limit` is capped at `max_page_size`. Unknown sort values are not errors.
pub fn normalize_filter(
    user_id: i64,
    raw: ListTransactionsQuery,
    max_page_size: i64,
) -> Result<TransactionFilter, ListingError> {
    let start_date = parse_date(raw.start_date.as_deref(), INVALID_START_DATE)?;
    let end_date = parse_date(raw.end_date.as_deref(), INVALID_END_DATE)?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            return Err(ListingError::Validation(
                "Start date must not be after end date".to_string(),
            ));
        }
    }

    let mut filter = TransactionFilter::for_user(user_id);
    filter.page = raw.page.filter(|&p| p > 0).unwrap_or(DEFAULT_PAGE);
    filter.limit = raw
        .limit
        .filter(|&l| l > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(max_page_size.max(1));
    filter.search = raw.search.filter(|s| !s.is_empty());
    filter.sort_by = raw.sort_by.as_deref().map(SortBy::parse).unwrap_or_default();
    filter.sort_order = raw.sort_order.as_deref().map(SortOrder::parse).unwrap_or_default();
    filter.start_date = start_date;
    filter.end_date = end_date;

    Ok(filter)
}

/// `%Y-%m-%d` alone also takes signed years and single-digit fields
fn parse_date(value: Option<&str>, message: &str) -> Result<Option<NaiveDate>, ListingError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) if is_iso_date_shape(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Some)
            .map_err(|_| ListingError::Validation(message.to_string())),
        Some(_) => Err(ListingError::Validation(message.to_string())),
    }
}

/// Exactly `dddd-dd-dd`
fn is_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// List a page of the caller's transactions with pagination metadata.
///
/// Nothing is returned unless both the count and the page succeed. The
/// whole store round trip is abandoned once `options.timeout` elapses, and
/// the server cancels its statements at the same deadline.
pub async fn list_transactions(
    pool: &PgPool,
    user_id: i64,
    raw: ListTransactionsQuery,
    options: ListingOptions,
) -> Result<TransactionListResponse, ListingError> {
    let filter = normalize_filter(user_id, raw, options.max_page_size)?;
    debug!(?filter, "Listing transactions");

    let (transactions, total_items) = tokio::time::timeout(
        options.timeout,
        db::transaction::list_user_transactions(
            pool,
            &filter,
            options.consistency,
            options.timeout,
        ),
    )
    .await
    .map_err(|_| ListingError::Timeout(options.timeout))?
    .map_err(|err| {
        if db::transaction::is_query_cancelled(&err) {
            ListingError::Timeout(options.timeout)
        } else {
            ListingError::Store(err)
        }
    })?;

    Ok(TransactionListResponse {
        transactions,
        pagination: PaginationInfo::new(filter.page, filter.limit, total_items),
    })
}
