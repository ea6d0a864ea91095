use crate::models::PaginationInfo;

/// Number of pages needed to show `total_items` at `per_page` items each.
///
/// `per_page` must be at least 1; the filter normalizer guarantees it.
pub fn total_pages(total_items: i64, per_page: i64) -> i64 {
    if total_items <= 0 {
        return 0;
    }
    total_items / per_page + i64::from(total_items % per_page != 0)
}

impl PaginationInfo {
    /// Build pagination metadata for the page that was just fetched
    pub fn new(current_page: i64, per_page: i64, total_items: i64) -> Self {
        PaginationInfo {
            current_page,
            total_pages: total_pages(total_items, per_page),
            total_items,
            items_per_page: per_page,
        }
    }
}
