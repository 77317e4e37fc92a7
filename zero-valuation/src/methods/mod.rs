//! Deterministic Valuation Methods.
//!
//! Three classical methods that each produce a single value from the input:
//!
//! | Method           | Needs                          | Domain failure               |
//! |------------------|--------------------------------|------------------------------|
//! | DCF              | revenue (growth, margin opt.)  | terminal growth ≥ WACC       |
//! | Revenue multiple | revenue, peer EV/Revenue       | no usable comparables        |
//! | Asset based      | tangible assets                | none (negative NAV allowed)  |
//!
//! # Usage
//!
//! ```ignore
//! use zero_valuation::methods::{compute_dcf, DcfAssumptions};
//!
//! let dcf = compute_dcf(&input, &DcfAssumptions::default())?;
//! println!("DCF value {:.0} at WACC {:.2}%", dcf.value, dcf.wacc * 100.0);
//! ```

pub mod asset;
pub mod dcf;
pub mod multiple;
pub mod types;

pub use asset::compute_asset_based;
pub use dcf::compute_dcf;
pub use multiple::compute_multiple;
pub use types::{
    AssetResult, CashFlowProjection, DcfAssumptions, DcfResult, MultipleResult, PeerMultiple,
};
