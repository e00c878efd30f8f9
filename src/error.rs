use thiserror::Error;

/// Errors raised by the statistics and mapping layer.
///
/// These are deterministic failures of pure computations; a chart driver
/// that hits one gives up on that chart only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// A raw row whose required field does not convert to a finite number.
    #[error("row {row}: field '{field}' has non-numeric value '{value}'")]
    MalformedRow {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// Aggregation over a group with no members.
    #[error("cannot compute {op} of an empty group")]
    EmptyGroup { op: &'static str },

    /// Estimation or layout over an empty input sequence.
    #[error("{what} requires at least one value")]
    EmptyInput { what: &'static str },

    /// Regression input that does not determine a line.
    #[error("degenerate regression input: {reason}")]
    DegenerateInput { reason: String },

    /// A continuous scale whose domain has zero width.
    #[error("degenerate scale domain [{min}, {max}]")]
    DegenerateDomain { min: f64, max: f64 },

    /// A parameter outside its accepted range.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, ChartError>;
