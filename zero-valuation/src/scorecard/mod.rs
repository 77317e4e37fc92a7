//! Scorecard Valuation Module.
//!
//! Implements the Scorecard (Bill Payne) method for pre-revenue and early
//! revenue companies: a peer baseline for the company's stage and sector is
//! adjusted by seven weighted qualitative factors.
//!
//! # The Seven Factors
//!
//! | Factor        | Weight | Band      |
//! |---------------|--------|-----------|
//! | Management    | 30%    | 20 - 130  |
//! | Opportunity   | 25%    | 30 - 140  |
//! | Product       | 15%    | 20 - 130  |
//! | Competitive   | 10%    | 30 - 120  |
//! | Marketing     | 10%    | 30 - 130  |
//! | Funding need  | 5%     | 30 - 130  |
//! | Other         | 5%     | 40 - 120  |
//!
//! # Usage
//!
//! ```ignore
//! use zero_valuation::scorecard::compute_scorecard;
//!
//! let result = compute_scorecard(&input)?;
//! println!("Valuation: {:.0} ({:.0} - {:.0})",
//!     result.valuation, result.ranges.conservative, result.ranges.aggressive);
//! ```

pub mod analyzer;
pub mod baseline;
pub mod factors;
pub mod types;

pub use analyzer::{compute_scorecard, ScorecardAnalyzer, ScorecardConfig, SignalCoverage};
pub use baseline::{location_multiplier, BaselineKey, BaselineSource, BaselineTable};
pub use factors::Factor;
pub use types::{FactorScore, ScorecardResult, ValuationRange};
