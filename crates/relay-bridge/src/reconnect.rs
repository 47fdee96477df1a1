//! Bounded exponential backoff for AI-peer reconnects (`spec.md` §4.6).

use std::time::Duration;

/// Delay before reconnect attempt number `attempt` (1-indexed): `1000 *
/// 2^(attempt-1)` ms. `attempt` is expected to be `>= 1`; `attempt == 0` is
/// treated as no delay (the initial connection attempt never backs off).
#[must_use]
pub fn backoff_for(attempt: u32) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }
    let exponent = attempt - 1;
    let millis = 1000u64.saturating_mul(1u64 << exponent.min(32));
    Duration::from_millis(millis)
}
