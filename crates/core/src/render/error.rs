//! Renderer error types.

use thiserror::Error;

use tresor_shared::AppError;

/// Errors raised during artifact synthesis.
#[derive(Debug, Error)]
pub enum RenderError {
    /// PDF synthesis failed.
    #[error("PDF synthesis failed: {0}")]
    Pdf(String),

    /// Spreadsheet synthesis failed.
    #[error("Spreadsheet synthesis failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        Self::Rendering(e.to_string())
    }
}
