//! Errors surfaced by the renderer.

use thiserror::Error;

/// Errors that abort a render before any pixel work is dispatched.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to allocate output buffer for {pixels} pixels")]
    Allocation { pixels: u64 },
}

pub type RenderResult<T> = Result<T, RenderError>;
