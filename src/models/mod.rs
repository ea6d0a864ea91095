//! Data models for the transaction listing API
//!
//! Request parameters, the normalized filter and the response body.

pub mod transaction;

pub use transaction::{
    ListTransactionsQuery, PaginationInfo, SortBy, SortOrder, Transaction, TransactionFilter,
    TransactionListResponse, DEFAULT_LIMIT, DEFAULT_PAGE,
};
