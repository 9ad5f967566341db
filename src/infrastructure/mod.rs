//! Infrastructure layer - concrete implementations of application ports

pub mod openapi;
pub mod output;
pub mod rendering;
