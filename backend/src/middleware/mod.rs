//! Cross-cutting request middleware.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, TraceId, attach_trace_id};
