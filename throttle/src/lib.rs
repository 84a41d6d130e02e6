//! Rate limiting for coordination-service operations
//!
//! Copying a large tree issues several requests per node against both clusters. This crate
//! provides a process-wide token bucket that callers consume from before touching a node, so
//! that a bulk copy does not overwhelm a production ensemble.
//!
//! # Usage
//!
//! ```rust,no_run
//! use throttle::{init_ops_tokens, run_ops_replenish_thread, get_ops_token, replenish_schedule};
//!
//! # async fn example() {
//! // 500 operations per second
//! let (tokens, interval) = replenish_schedule(500);
//! init_ops_tokens(tokens);
//! tokio::spawn(run_ops_replenish_thread(tokens, interval));
//!
//! // Acquire a token before each node
//! get_ops_token().await;
//! # }
//! ```
//!
//! When the throttle is never initialized (or initialized with 0) [`get_ops_token`] returns
//! immediately.

mod semaphore;

static OPS_THROTTLE: std::sync::LazyLock<semaphore::Semaphore> =
    std::sync::LazyLock::new(semaphore::Semaphore::new);

/// Replenish interval used for moderate rates; high rates use a tenth of it.
const DEFAULT_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

pub fn init_ops_tokens(ops_tokens: usize) {
    OPS_THROTTLE.setup(ops_tokens);
}

pub async fn get_ops_token() {
    OPS_THROTTLE.consume().await;
}

pub async fn run_ops_replenish_thread(replenish: usize, interval: std::time::Duration) {
    OPS_THROTTLE.run_replenish_thread(replenish, interval).await;
}

/// Splits an operations-per-second budget into `(tokens, interval)`.
///
/// The token count is picked so that replenishments happen roughly every 100ms (every 10ms
/// above 1000 ops/s, at least one token each time), then the interval is derived from it so
/// that `tokens / interval` is exactly the requested rate.
#[must_use]
pub fn replenish_schedule(ops_per_second: usize) -> (usize, std::time::Duration) {
    if ops_per_second == 0 {
        return (0, DEFAULT_INTERVAL);
    }
    let tokens = match ops_per_second / 10 {
        0 => 1,
        per_default if per_default > 100 => ops_per_second / 100,
        per_default => per_default,
    };
    let nanos = tokens as u128 * 1_000_000_000 / ops_per_second as u128;
    let interval = std::time::Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX));
    (tokens, interval)
}
