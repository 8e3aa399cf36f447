//! Tracing utilities for query compilation observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the rendered SQL text and parameter count.
///
/// ```ignore
/// ormlite_trace_query!("select", &statement.sql, statement.params.len());
/// ```
#[macro_export]
macro_rules! ormlite_trace_query {
    ($kind:expr, $sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(kind = $kind, sql = %$sql, params = $param_count, "ormlite.query");
    };
}

/// Emit a trace-level event when a join condition is inferred from foreign-key metadata.
///
/// ```ignore
/// ormlite_trace_join!("Order", "Customer", "CustomerId");
/// ```
#[macro_export]
macro_rules! ormlite_trace_join {
    ($from:expr, $to:expr, $column:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(from = %$from, to = %$to, column = %$column, "ormlite.join.inferred");
    };
}
