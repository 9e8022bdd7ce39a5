//! Crate-wide error type.
//!
//! Each concern keeps its own error enum next to the code that raises it;
//! [`Error`] folds them together for callers that just want to report.

use crate::dialog::DialogError;
use crate::mxgraph::ImportError;
use crate::solver::SolverError;
use thiserror::Error;

/// Any failure the editor reports to the user.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Diagram JSON that does not parse
    #[error("Diagram file error: {0}")]
    Json(#[from] serde_json::Error),

    /// mxGraph XML that cannot be imported
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    /// Solver request failure
    #[error("Simulation request failed: {0}")]
    Solver(#[from] SolverError),

    /// Dialog could not be opened
    #[error("Cannot open dialog: {0}")]
    Dialog(#[from] DialogError),

    /// Window could not be created
    #[error("Window error: {0}")]
    Gui(#[from] eframe::Error),
}

/// Result with the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_domain_errors_with_context() {
        let err: Error = DialogError::NoComponentTag("7".into()).into();
        assert_eq!(err.to_string(), "Cannot open dialog: cell 7 has no component tag");

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(err.to_string().starts_with("I/O error"));
    }
}
