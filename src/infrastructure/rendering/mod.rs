//! Emission adapter: renders artifact sets into Rust source with Tera

pub mod context;
pub mod cycles;
pub mod errors;
pub mod template_renderer;

pub use context::{RustContextBuilder, RustTypeMapper};
pub use cycles::RecursionGroups;
pub use errors::RenderError;
pub use template_renderer::TeraArtifactRenderer;
