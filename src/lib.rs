//! bindsmith: OpenAPI to client-binding synthesis
//!
//! The `generation` module holds the pure engine: operation filtering,
//! schema trimming, interface grouping, contract synthesis and artifact
//! partitioning. `infrastructure` adapts documents in and Rust source out,
//! and `application` wires both into single and batch runs.
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod generation;
pub mod infrastructure;
