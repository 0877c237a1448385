//! Brand look-alike scoring powered by `strsim`.
//!
//! Candidates are compared to a brand dictionary twice: as written, and after
//! the confusable rewrite from [`crate::features::normalize::normalize_confusables`].
//! The better of the two comparisons wins.

use crate::features::normalize::normalize_confusables;
use serde::{Deserialize, Serialize};

/// Closest brand for a candidate label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMatch {
    pub brand: String,
    /// Token of the URL that resembled the brand.
    pub candidate: String,
    /// Edit distance after the better of the two comparisons.
    pub distance: usize,
    /// Similarity in [0.0, 1.0] (higher is more similar).
    pub similarity: f64,
    /// True when the confusable rewrite produced the match.
    pub via_confusables: bool,
}

/// Bounds for look-alike comparisons.
#[derive(Debug, Clone, Copy)]
pub struct MatchLimits {
    pub max_distance: usize,
    pub min_brand_len: usize,
    pub max_len: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            max_distance: 2,
            min_brand_len: 4,
            max_len: 64,
        }
    }
}

/// Normalized Levenshtein distance in [0.0, 1.0].
pub fn normalized_distance(a: &str, b: &str) -> f64 {
    1.0 - strsim::normalized_levenshtein(a, b)
}

fn similarity_for(distance: usize, a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count()).max(1);
    (1.0 - distance as f64 / longest as f64).clamp(0.0, 1.0)
}

/// Compare one candidate against one brand.
///
/// An exact match is the brand itself and is never reported. A match after
/// the confusable rewrite scores 1.0; otherwise the edit distance must be
/// within `max_distance` and the brand at least `min_brand_len` long.
pub fn compare_brand(candidate: &str, brand: &str, limits: &MatchLimits) -> Option<BrandMatch> {
    if candidate == brand || candidate.is_empty() {
        return None;
    }
    // Bound the quadratic comparison
    if candidate.len().max(brand.len()) > limits.max_len {
        return None;
    }

    let normalized = normalize_confusables(candidate);
    if normalized == brand {
        return Some(BrandMatch {
            brand: brand.to_string(),
            candidate: candidate.to_string(),
            distance: strsim::levenshtein(candidate, brand),
            similarity: 1.0,
            via_confusables: true,
        });
    }

    if brand.chars().count() < limits.min_brand_len {
        return None;
    }

    let raw = strsim::levenshtein(candidate, brand);
    let norm = strsim::levenshtein(&normalized, brand);
    let (distance, via_confusables, compared) = if norm < raw {
        (norm, true, normalized.as_str())
    } else {
        (raw, false, candidate)
    };
    if distance == 0 || distance > limits.max_distance {
        return None;
    }

    Some(BrandMatch {
        brand: brand.to_string(),
        candidate: candidate.to_string(),
        distance,
        similarity: similarity_for(distance, compared, brand),
        via_confusables,
    })
}

/// Find the closest brand among all candidate tokens.
///
/// Ties keep the earliest candidate/brand pair, so results are deterministic.
pub fn best_brand_match<'a, C, B>(candidates: C, brands: B, limits: &MatchLimits) -> Option<BrandMatch>
where
    C: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str> + Clone,
{
    let mut best: Option<BrandMatch> = None;
    for cand in candidates {
        for brand in brands.clone() {
            if let Some(m) = compare_brand(cand, brand, limits) {
                match &best {
                    None => best = Some(m),
                    Some(b) if m.similarity > b.similarity => best = Some(m),
                    _ => {}
                }
            }
        }
    }
    best
}

/// Loose similarity used by the token pass: 1..=`max_distance` edits apart.
pub fn is_near_miss(token: &str, brand: &str, max_distance: usize) -> bool {
    if token == brand {
        return false;
    }
    let (lt, lb) = (token.chars().count(), brand.chars().count());
    if lt < 4 || lt.abs_diff(lb) > max_distance {
        return false;
    }
    let d = strsim::levenshtein(token, brand);
    (1..=max_distance).contains(&d)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRANDS: [&str; 4] = ["paypal", "google", "microsoft", "dhl"];

    #[test]
    fn digit_substitution_normalizes_to_brand() {
        let m = compare_brand("paypa1", "paypal", &MatchLimits::default()).unwrap();
        assert_eq!(m.similarity, 1.0);
        assert!(m.via_confusables);
    }

    #[test]
    fn exact_brand_is_not_a_typo() {
        assert!(compare_brand("paypal", "paypal", &MatchLimits::default()).is_none());
    }

    #[test]
    fn edit_distance_match() {
        let m = compare_brand("gooogle", "google", &MatchLimits::default()).unwrap();
        assert_eq!(m.distance, 1);
        assert!(m.similarity > 0.8);
        assert!(!m.via_confusables);
    }

    #[test]
    fn rn_rewrite_to_m() {
        let m = compare_brand("rnicrosoft", "microsoft", &MatchLimits::default()).unwrap();
        assert_eq!(m.similarity, 1.0);
    }

    #[test]
    fn short_brand_requires_confusable_match() {
        let limits = MatchLimits::default();
        assert!(compare_brand("dh1", "dhl", &limits).is_some());
        assert!(compare_brand("dhx", "dhl", &limits).is_none());
    }

    #[test]
    fn best_match_over_tokens() {
        let best = best_brand_match(
            ["secure", "paypa1"].iter().copied(),
            BRANDS.iter().copied(),
            &MatchLimits::default(),
        )
        .unwrap();
        assert_eq!(best.brand, "paypal");
        assert_eq!(best.candidate, "paypa1");
    }

    #[test]
    fn near_miss_bounds() {
        assert!(is_near_miss("paypai", "paypal", 2));
        assert!(!is_near_miss("paypal", "paypal", 2));
        assert!(!is_near_miss("pay", "paypal", 2));
        assert!(normalized_distance("abc", "abc") == 0.0);
    }
}
