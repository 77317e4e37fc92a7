//! Method recommendation types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Valuation approach that can be recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendedMethod {
    Dcf,
    Comparables,
    Hybrid,
}

impl RecommendedMethod {
    /// Ranking order on equal confidence.
    pub const ALL: [RecommendedMethod; 3] = [Self::Dcf, Self::Comparables, Self::Hybrid];

    /// Inputs the method needs to produce a meaningful value.
    pub fn requirements(self) -> &'static [&'static str] {
        match self {
            Self::Dcf => &["revenue", "growthRate", "operatingMargin", "stage"],
            Self::Comparables => &["revenue", "sector", "stage"],
            Self::Hybrid => &["revenue", "operatingMargin", "sector", "stage"],
        }
    }

    pub fn pros(self) -> &'static [&'static str] {
        match self {
            Self::Dcf => &[
                "Grounded in the company's own cash generation",
                "Makes growth and margin assumptions explicit",
            ],
            Self::Comparables => &[
                "Reflects current market pricing",
                "Easy to explain to investors",
            ],
            Self::Hybrid => &[
                "Balances intrinsic and market views",
                "Less sensitive to a single bad assumption",
            ],
        }
    }

    pub fn cons(self) -> &'static [&'static str] {
        match self {
            Self::Dcf => &[
                "Highly sensitive to discount and terminal growth rates",
                "Unreliable without operating history",
            ],
            Self::Comparables => &[
                "Depends on the quality of the peer set",
                "Imports market mispricing",
            ],
            Self::Hybrid => &[
                "Needs the inputs of several methods",
                "Weighting between methods is a judgement call",
            ],
        }
    }
}

impl fmt::Display for RecommendedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dcf => "DCF",
            Self::Comparables => "Comparables",
            Self::Hybrid => "Hybrid",
        };
        f.write_str(name)
    }
}

/// Score and rationale for one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodRecommendation {
    pub method: RecommendedMethod,
    /// Suitability, 0-100
    pub confidence: f64,
    pub reasoning: String,
    pub requirements: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Ranked recommendation with data-quality feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodAnalysis {
    pub primary: MethodRecommendation,
    /// Remaining methods, best first
    pub alternatives: Vec<MethodRecommendation>,
    /// 0-100
    pub data_quality_score: f64,
    pub suggestions: Vec<String>,
}
