//! Middleware layer.
//!
//! Cross-cutting concerns that wrap every request before it reaches the
//! router. Currently only request tracing.

pub mod trace;
