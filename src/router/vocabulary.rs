//! The domain-relevance heuristic.
//!
//! A keyword-membership gate, not a classifier: a query counts as in-domain
//! when it contains any vocabulary term, case-insensitively. Substring
//! containment is intentional — "lookback windows" should match
//! "lookback window".

/// Statistical/experimentation terminology the knowledge base covers.
pub const DOMAIN_VOCABULARY: &[&str] = &[
    "geolift",
    "holdout",
    "effect size",
    "power analysis",
    "synthetic control",
    "treatment",
    "control",
    "market selection",
    "lookback window",
    "alpha",
    "statistical significance",
    "lift",
    "incrementality",
    "cpic",
    "mde",
    "minimum detectable effect",
    "fixed effects",
    "correlation",
    "exclude",
    "include",
    "market",
    "location",
    "budget",
    "investment",
    "experiment",
    "test",
    "analysis",
    "parameter",
    "setting",
];

/// Returns `true` when the query contains at least one vocabulary term.
pub fn is_domain_query(query: &str) -> bool {
    let query_lower = query.to_lowercase();
    DOMAIN_VOCABULARY
        .iter()
        .any(|term| query_lower.contains(term))
}
