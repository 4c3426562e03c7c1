//! `fretdesk-observability` — process-wide logging setup.

pub mod tracing;
