//! Valuation engine errors.
//!
//! Domain errors are fatal to a single computation but never to the process.
//! Input-shape errors are raised before any sampling or projection starts.

use thiserror::Error;

/// Result type alias for engine computations.
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Failure of a single valuation computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Gordon growth would divide by a non-positive spread
    #[error("terminal growth rate {terminal_growth:.4} must be below WACC {wacc:.4}")]
    TerminalGrowthExceedsWacc { terminal_growth: f64, wacc: f64 },

    /// Market comparables provider returned nothing usable
    #[error("no comparables available for sector {sector}")]
    NoComparables { sector: String },

    /// Monte Carlo run requested with zero iterations
    #[error("simulation requires at least one iteration")]
    ZeroIterations,

    /// No qualifying signal to compute from
    #[error("request requires minimum data: {0}")]
    InsufficientData(String),

    /// A field the method cannot run without is absent
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    /// Malformed or out-of-range input
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Evaluation exceeded its deadline
    #[error("evaluation timed out after {0}s")]
    Timeout(u64),

    /// External collaborator failure
    #[error("provider error: {0}")]
    Provider(String),

    /// Background computation task failed to complete
    #[error("computation task failed: {0}")]
    TaskFailed(String),
}

impl ValuationError {
    /// Create an input-shape error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is a domain error (valid input, no defined answer).
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::TerminalGrowthExceedsWacc { .. }
                | Self::NoComparables { .. }
                | Self::ZeroIterations
                | Self::InsufficientData(_)
        )
    }

    /// Whether the input itself was malformed or incomplete.
    pub fn is_input_shape(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::MissingInput(_))
    }

    /// Stable machine-readable tag for reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TerminalGrowthExceedsWacc { .. } => "terminal_growth_exceeds_wacc",
            Self::NoComparables { .. } => "no_comparables",
            Self::ZeroIterations => "zero_iterations",
            Self::InsufficientData(_) => "insufficient_data",
            Self::MissingInput(_) => "missing_input",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Timeout(_) => "timeout",
            Self::Provider(_) => "provider",
            Self::TaskFailed(_) => "task_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let dcf = ValuationError::TerminalGrowthExceedsWacc {
            terminal_growth: 0.10,
            wacc: 0.08,
        };
        assert!(dcf.is_domain());
        assert!(!dcf.is_input_shape());
        assert_eq!(dcf.code(), "terminal_growth_exceeds_wacc");

        let shape = ValuationError::invalid("growthRate", "outside [-1, 10]");
        assert!(shape.is_input_shape());
        assert!(!shape.is_domain());

        assert!(ValuationError::MissingInput("revenue").is_input_shape());
        assert!(!ValuationError::Timeout(30).is_domain());
    }

    #[test]
    fn test_error_display() {
        let err = ValuationError::TerminalGrowthExceedsWacc {
            terminal_growth: 0.1,
            wacc: 0.08,
        };
        assert_eq!(
            err.to_string(),
            "terminal growth rate 0.1000 must be below WACC 0.0800"
        );
        assert_eq!(
            ValuationError::NoComparables {
                sector: "saas".into()
            }
            .to_string(),
            "no comparables available for sector saas"
        );
    }
}
