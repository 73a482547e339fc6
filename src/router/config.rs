/// Routing thresholds and limits.
///
/// The thresholds are distances (lower = more similar), hand-tuned against
/// the deployed embedding model. They are configuration rather than code so
/// a re-embedded catalog can recalibrate without a rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterConfig {
    /// Below this distance a domain match is trusted verbatim.
    pub excellent_threshold: f32,

    /// Below this distance grounded generation is worthwhile; above it an
    /// out-of-domain query goes to pure generation.
    pub good_threshold: f32,

    /// Below this distance a domain match still answers without disclaimer.
    pub high_confidence_threshold: f32,

    /// How many ranked candidates the disclaimer-branch formatter may
    /// consult (best match plus related lookback).
    pub disclaimer_lookback_limit: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            excellent_threshold: 0.5,
            good_threshold: 1.2,
            high_confidence_threshold: 0.7,
            disclaimer_lookback_limit: 3,
        }
    }
}
