//! External collaborator abstractions.
//!
//! The engine never fetches anything itself. Peer multiples and qualitative
//! commentary arrive through these traits so the orchestration layer can
//! plug in a market-data service or a language model without touching any
//! numeric code.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use zero_common::config::ComparablesConfig;

use crate::methods::PeerMultiple;
use crate::types::{Sector, ValuationInput};

// ============================================================================
// Provider Error
// ============================================================================

/// Errors raised by external collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Backend could not be reached
    Unavailable(String),
    /// Backend has no data for the request
    DataNotAvailable(String),
    /// Request arguments rejected by the backend
    InvalidRequest(String),
    Internal(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "Provider unavailable: {}", msg),
            Self::DataNotAvailable(msg) => write!(f, "Data not available: {}", msg),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<ProviderError> for crate::error::ValuationError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err.to_string())
    }
}

// ============================================================================
// Comparables
// ============================================================================

/// Source of peer trading multiples.
#[async_trait]
pub trait ComparablesProvider: Send + Sync {
    /// Provider name (e.g., "static")
    fn name(&self) -> &'static str;

    /// Fetch peer multiples for a sector.
    ///
    /// An empty list is a valid answer and makes the revenue-multiple
    /// method fail with `NoComparables`.
    async fn fetch_comparables(
        &self,
        sector: Sector,
        industry: Option<&str>,
    ) -> Result<Vec<PeerMultiple>, ProviderError>;
}

/// Built-in EV/Revenue multiples by sector.
const BUILTIN_MULTIPLES: &[(Sector, &[f64])] = &[
    (Sector::Saas, &[6.5, 7.2, 8.0, 10.5, 12.0]),
    (Sector::Fintech, &[4.5, 5.2, 6.0, 7.5]),
    (Sector::Healthtech, &[4.0, 5.5, 6.8]),
    (Sector::Deeptech, &[5.0, 7.0, 9.0]),
    (Sector::Marketplace, &[2.5, 3.5, 4.5]),
    (Sector::Edtech, &[2.5, 3.5, 4.2]),
    (Sector::Ecommerce, &[1.2, 1.8, 2.5]),
    (Sector::Consumer, &[1.5, 2.2, 3.0]),
];

/// Serves peer multiples from an in-memory table.
///
/// Starts from the built-in table; sectors present in configuration replace
/// the built-in entry. `Sector::Other` has no built-in peers.
pub struct StaticComparablesProvider {
    sectors: HashMap<Sector, Vec<f64>>,
}

impl StaticComparablesProvider {
    pub fn new() -> Self {
        let sectors = BUILTIN_MULTIPLES
            .iter()
            .map(|(sector, multiples)| (*sector, multiples.to_vec()))
            .collect();
        Self { sectors }
    }

    /// Built-in table overridden by configured sectors.
    pub fn from_config(config: &ComparablesConfig) -> Self {
        let mut provider = Self::new();
        for sector in BUILTIN_MULTIPLES
            .iter()
            .map(|(s, _)| *s)
            .chain(std::iter::once(Sector::Other))
        {
            if let Some(multiples) = config.for_sector(sector.as_str()) {
                provider.sectors.insert(sector, multiples.to_vec());
            }
        }
        provider
    }

    pub fn with_sector(mut self, sector: Sector, multiples: Vec<f64>) -> Self {
        self.sectors.insert(sector, multiples);
        self
    }
}

impl Default for StaticComparablesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComparablesProvider for StaticComparablesProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_comparables(
        &self,
        sector: Sector,
        industry: Option<&str>,
    ) -> Result<Vec<PeerMultiple>, ProviderError> {
        let label = industry.unwrap_or(sector.as_str());
        let peers = self
            .sectors
            .get(&sector)
            .map(|multiples| {
                multiples
                    .iter()
                    .enumerate()
                    .map(|(i, m)| PeerMultiple::new(format!("{label}-peer-{}", i + 1), *m))
                    .collect()
            })
            .unwrap_or_default();
        Ok(peers)
    }
}

// ============================================================================
// Qualitative Insights
// ============================================================================

/// Source of free-text commentary on a valuation input.
///
/// Output is merged into report text only, never into numbers.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn insights(&self, input: &ValuationInput) -> Result<Vec<String>, ProviderError>;
}

/// Insight provider that contributes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInsightProvider;

#[async_trait]
impl InsightProvider for NoopInsightProvider {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn insights(&self, _input: &ValuationInput) -> Result<Vec<String>, ProviderError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_static_provider_known_sector() {
        let provider = StaticComparablesProvider::new();
        let peers = provider
            .fetch_comparables(Sector::Saas, Some("devtools"))
            .await
            .unwrap();
        assert_eq!(peers.len(), 5);
        assert_eq!(peers[0].name, "devtools-peer-1");
    }

    #[tokio::test]
    async fn test_static_provider_other_sector_is_empty() {
        let provider = StaticComparablesProvider::new();
        let peers = provider.fetch_comparables(Sector::Other, None).await.unwrap();
        assert!(peers.is_empty());
    }

    #[tokio::test]
    async fn test_config_overrides_builtin() {
        let mut sectors = BTreeMap::new();
        sectors.insert("fintech".to_string(), vec![3.0]);
        sectors.insert("other".to_string(), vec![2.0, 4.0]);
        let provider = StaticComparablesProvider::from_config(&ComparablesConfig { sectors });

        let fintech = provider.fetch_comparables(Sector::Fintech, None).await.unwrap();
        assert_eq!(fintech.len(), 1);
        assert_eq!(fintech[0].ev_revenue, 3.0);

        let other = provider.fetch_comparables(Sector::Other, None).await.unwrap();
        assert_eq!(other.len(), 2);
    }

    #[tokio::test]
    async fn test_noop_insights() {
        let insights = NoopInsightProvider
            .insights(&ValuationInput::default())
            .await
            .unwrap();
        assert!(insights.is_empty());
    }

    #[test]
    fn test_provider_error_display() {
        let cases = [
            (ProviderError::Unavailable("down".into()), "Provider unavailable: down"),
            (ProviderError::DataNotAvailable("fintech".into()), "Data not available: fintech"),
            (ProviderError::InvalidRequest("sector".into()), "Invalid request: sector"),
            (ProviderError::Internal("boom".into()), "Internal error: boom"),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
        let boxed: Box<dyn std::error::Error> = Box::new(ProviderError::Internal("x".into()));
        assert_eq!(boxed.to_string(), "Internal error: x");
    }

    #[test]
    fn test_provider_error_conversion() {
        let err: crate::error::ValuationError =
            ProviderError::Unavailable("timeout".into()).into();
        assert_eq!(err.code(), "provider");
        assert!(err.to_string().contains("Provider unavailable"));
    }
}
