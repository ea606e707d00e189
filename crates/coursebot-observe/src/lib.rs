//! Observability setup for Coursebot: tracing subscriber and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
