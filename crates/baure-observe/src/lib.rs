//! Observability setup for the Baure cultural archive: structured logging
//! through `tracing`, with optional OpenTelemetry span export.

pub mod tracing_setup;
