use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use lazy_static::lazy_static;
use tokio::sync::Mutex;

lazy_static! {
    // Per-user request timestamps (ms) inside the current sliding window
    static ref USER_REQUESTS: Mutex<HashMap<i64, Vec<u64>>> = Mutex::new(HashMap::new());
}

const RATE_WINDOW_MS: u64 = 1000;    // 1 second in milliseconds
const MAX_TRACKED_USERS: usize = 10_000;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Check a user's request budget (`limit` requests per second)
/// Returns Ok(()) if under limit, Err(remaining_ms) until a slot frees up
pub async fn check_rate_limit(user_id: i64, limit: usize) -> Result<(), u64> {
    check_rate_limit_at(user_id, limit, now_ms()).await
}

async fn check_rate_limit_at(user_id: i64, limit: usize, now: u64) -> Result<(), u64> {
    let window_start = now.saturating_sub(RATE_WINDOW_MS);

    let mut users = USER_REQUESTS.lock().await;

    // Forget users whose whole window has expired
    if users.len() >= MAX_TRACKED_USERS {
        users.retain(|_, requests| requests.last().is_some_and(|&t| t > window_start));
    }

    let requests = users.entry(user_id).or_default();
    requests.retain(|&timestamp| timestamp > window_start);

    if requests.len() >= limit {
        let oldest_leaves_at = requests[0] + RATE_WINDOW_MS;
        Err(oldest_leaves_at.saturating_sub(now).max(1))
    } else {
        requests.push(now);
        Ok(())
    }
}
