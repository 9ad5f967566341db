//! Application layer - orchestrates use cases and coordinates between domains

pub mod batch;
pub mod dto;
pub mod errors;
pub mod generate_client;
pub mod traits;

pub use batch::{BatchGenerator, BatchOutcome, discover_settings_files};
pub use dto::*;
pub use errors::*;
pub use generate_client::GenerateClientUseCase;
pub use traits::*;
