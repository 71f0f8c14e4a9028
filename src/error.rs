use thiserror::Error;

/// Errors raised while building or exporting a figure.
///
/// Degenerate data (empty, constant or non-overlapping series) is never an
/// error; it shows up as NaN statistics and degenerate histograms instead.
#[derive(Debug, Error)]
pub enum FigureError {
    /// Two lists that are compared element by element differ in length.
    #[error("list length mismatch between {left} ({left_len}) and {right} ({right_len})")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("statistics table error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FigureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_lists() {
        let err = FigureError::LengthMismatch {
            left: "observed",
            left_len: 3,
            right: "predicted",
            right_len: 2,
        };
        assert_eq!(
            err.to_string(),
            "list length mismatch between observed (3) and predicted (2)"
        );
    }
}
