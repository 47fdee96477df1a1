//! Four-counter metrics adapter, rendered as Prometheus text exposition.
//!
//! No metrics crate is pulled in: the surface is four fixed lines, so a
//! hand-rolled atomic struct is the right amount of machinery (mirrors the
//! teacher's preference for a small hand-rolled broadcaster over a
//! heavyweight dependency when the shape is this fixed).

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use relay_core::ports::MetricsSink;

#[derive(Debug, Default)]
pub struct AtomicMetrics {
    calls_total: AtomicU64,
    errors_total: AtomicU64,
    active_calls: AtomicI64,
    reconnects_total: AtomicU64,
}

impl AtomicMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsSink for AtomicMetrics {
    fn inc_calls_total(&self) {
        self.calls_total.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_errors_total(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    fn inc_active_calls(&self) {
        self.active_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn dec_active_calls(&self) {
        // Floor at zero: a duplicate terminal call-status callback must
        // never drive this negative.
        let _ = self
            .active_calls
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some((v - 1).max(0))
            });
    }

    fn inc_reconnects_total(&self) {
        self.reconnects_total.fetch_add(1, Ordering::Relaxed);
    }

    fn render(&self) -> String {
        format!(
            "calls_total {}\nerrors_total {}\nactive_calls {}\nreconnects_total {}\n",
            self.calls_total.load(Ordering::Relaxed),
            self.errors_total.load(Ordering::Relaxed),
            self.active_calls.load(Ordering::Relaxed),
            self.reconnects_total.load(Ordering::Relaxed),
        )
    }
}
