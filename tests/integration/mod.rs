//! Integration tests
//!
//! Exercise the assistant pipeline end to end against scripted completion
//! backends and an in-memory data source.

mod support;

mod dedup_test;
mod tool_cache_test;
