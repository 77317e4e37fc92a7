//! Method Recommendation Module.
//!
//! Scores DCF, market comparables and a hybrid approach against the data
//! actually available, and reports data quality with concrete suggestions
//! for improving it.
//!
//! # Usage
//!
//! ```ignore
//! use zero_valuation::recommendation::recommend_method;
//!
//! let analysis = recommend_method(&input);
//! println!("{} ({:.0}%): {}", analysis.primary.method,
//!     analysis.primary.confidence, analysis.primary.reasoning);
//! ```

pub mod engine;
pub mod types;

pub use engine::{data_quality_score, recommend_method};
pub use types::{MethodAnalysis, MethodRecommendation, RecommendedMethod};
