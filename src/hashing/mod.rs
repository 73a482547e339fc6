//! Stable identifiers for materialized knowledge units.
//!
//! Unit ids are 64-bit truncations of BLAKE3 hashes. They identify a unit
//! across the vector index and the in-memory unit map, and they are what the
//! reranker carries through scoring so that duplicate candidate text never
//! has to be disambiguated by content equality.

use blake3::Hasher;

/// Computes a 64-bit hash of arbitrary bytes (BLAKE3, truncated to 8 bytes).
///
/// Truncation is acceptable here: ids are lookup keys for catalogs in the
/// thousands of entries, far below the 64-bit birthday bound. A collision
/// results in one unit shadowing another in the unit map, not corruption.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Derives the stable id for a materialized unit from its citation key and
/// semantic text.
///
/// The citation key alone is unique per the catalog's uniqueness rules, but
/// folding the text in means a re-authored record gets a fresh id and stale
/// vectors indexed for the old wording are never resolved to the new unit.
#[inline]
pub fn unit_id(citation: &str, text: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(citation.as_bytes());
    hasher.update(b"|");
    hasher.update(text.as_bytes());

    let hash = hasher.finalize();
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_to_u64_determinism() {
        let data = b"GeoLift.GeoLiftPower.lookback_window";

        let hash1 = hash_to_u64(data);
        let hash2 = hash_to_u64(data);

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_unit_id_uniqueness() {
        let ids = [
            unit_id("GeoLift.GeoLiftPower.alpha", "alpha\nSignificance level."),
            unit_id("GeoLift.GeoLiftPower.alpha", "alpha\nSignificance level"),
            unit_id("GeoLift.GeoLiftPower.Alpha", "alpha\nSignificance level."),
            unit_id("Generic concept: alpha", "alpha\nSignificance level."),
        ];

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_unit_id_separator_prevents_ambiguity() {
        // "ab" + "c" must not collide with "a" + "bc".
        assert_ne!(unit_id("ab", "c"), unit_id("a", "bc"));
    }

    #[test]
    fn test_unit_id_text_sensitivity() {
        let citation = "GeoLift.GeoLiftPower.effect_size";
        let old = unit_id(citation, "effect_size\nExpected lift.");
        let new = unit_id(citation, "effect_size\nExpected lift, as a fraction.");

        assert_ne!(old, new);
    }
}
