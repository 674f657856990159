//! Structural event logging.
//!
//! With the `tracing` feature enabled, `trace_event!` forwards to
//! `tracing::trace!` under the `pagetree::btree` target. Without it the macro
//! expands to nothing and its arguments are never evaluated.

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($($arg:tt)+) => {
        ::tracing::trace!(target: "pagetree::btree", $($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($($arg:tt)+) => {};
}

pub(crate) use trace_event;
