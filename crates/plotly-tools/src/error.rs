use thiserror::Error;

/// Errors raised while building or rendering figures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    /// Malformed caller input: mismatched lengths, unknown columns, empty layouts.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The figure needs more y axes than the plotly layout can address.
    #[error("figure needs {required} y axes but at most {supported} are supported")]
    TooManyAxes { required: usize, supported: usize },
}

impl PlotError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        PlotError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, PlotError>;
