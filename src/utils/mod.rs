pub mod page;
pub mod errors;
pub mod ratelimit;

pub use errors::{ApiError, ListingError};
pub use ratelimit::check_rate_limit;
