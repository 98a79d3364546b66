//! Observability utilities.

mod tracing;

pub use self::tracing::{init_tracing, SpanTimer, TracingConfig};
