//! Tracing hooks for extraction and rendering.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level event for a finished step.
///
/// ```ignore
/// schemabridge_trace!("extract", tables = tables.len());
/// ```
#[macro_export]
macro_rules! schemabridge_trace {
    ($step:literal $(, $key:ident = $value:expr)* $(,)?) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(step = $step $(, $key = $value)*, "schemabridge.codegen");
    };
}

/// Emit a warn-level event for input that was skipped rather than rejected.
///
/// ```ignore
/// schemabridge_warn!("type has no mappable members", ty = name.as_str());
/// ```
#[macro_export]
macro_rules! schemabridge_warn {
    ($msg:literal $(, $key:ident = $value:expr)* $(,)?) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($key = $value,)* $msg);
    };
}
