//! Metrics Counters port (C5, `spec.md` §4.5).

/// Four counters, rendered by the concrete adapter as Prometheus text
/// exposition. `active_calls` floors at zero on decrement — enforced by
/// the adapter, not the caller, so every call site can decrement
/// unconditionally without re-checking the current value.
pub trait MetricsSink: Send + Sync {
    fn inc_calls_total(&self);
    fn inc_errors_total(&self);
    fn inc_active_calls(&self);
    fn dec_active_calls(&self);
    fn inc_reconnects_total(&self);

    /// Render as the four-line Prometheus text exposition format.
    fn render(&self) -> String;
}
