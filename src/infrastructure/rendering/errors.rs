//! Errors raised while rendering artifacts to source text

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Failed to build render context for {artifact}: {message}")]
    Context { artifact: String, message: String },
}
