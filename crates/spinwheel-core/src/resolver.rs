//! Mapping an optional product code to a segment index.
//!
//! A code that names a segment (case-insensitively) always lands on the
//! first segment with that id. Anything else (no code, an empty code,
//! an unknown code) lands on a uniformly random segment. The random
//! source is a parameter so callers and tests control it.
//!
//! This is not a fair-gaming engine: there are no auditability or
//! statistical guarantees beyond what the supplied [`Rng`] provides.

use rand::Rng;
use spinwheel_types::Segment;

use crate::error::ResolveError;

/// How a [`Resolution`] was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The code matched a segment id.
    Matched,
    /// No usable code; the index was drawn at random.
    Fallback,
}

/// A resolved segment position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Index into the segment list the resolution was made against.
    pub index: usize,
    /// Whether the index came from a code match or the random fallback.
    pub outcome: ResolutionOutcome,
}

/// Resolve `code` against `segments`.
///
/// Returns [`ResolveError::NoSegments`] for an empty list; every
/// returned index is in `0..segments.len()`.
pub fn resolve<R: Rng + ?Sized>(
    code: Option<&str>,
    segments: &[Segment],
    rng: &mut R,
) -> Result<Resolution, ResolveError> {
    if segments.is_empty() {
        return Err(ResolveError::NoSegments);
    }

    let matched = code
        .filter(|c| !c.is_empty())
        .and_then(|c| segments.iter().position(|s| s.matches_code(c)));

    Ok(match matched {
        Some(index) => Resolution {
            index,
            outcome: ResolutionOutcome::Matched,
        },
        None => Resolution {
            index: rng.random_range(0..segments.len()),
            outcome: ResolutionOutcome::Fallback,
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use rand::{RngCore, SeedableRng};
    use rand::rngs::SmallRng;

    use super::*;
    use crate::store::default_segments;

    #[test]
    fn exact_and_case_insensitive_matches() {
        let segments = default_segments();
        let mut rng = SmallRng::seed_from_u64(7);

        for (code, expected) in [("SKU_A", 0), ("sku_c", 2), ("Sku_F", 5)] {
            let r = resolve(Some(code), &segments, &mut rng).unwrap();
            assert_eq!(r.index, expected, "{code}");
            assert_eq!(r.outcome, ResolutionOutcome::Matched);
        }
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let segments = vec![
            Segment::new("X", "first", "#1"),
            Segment::new("Y", "other", "#2"),
            Segment::new("x", "second", "#3"),
        ];
        let mut rng = SmallRng::seed_from_u64(1);
        let r = resolve(Some("X"), &segments, &mut rng).unwrap();
        assert_eq!(r.index, 0);
    }

    #[test]
    fn unknown_empty_and_missing_codes_fall_back() {
        let segments = default_segments();
        let mut rng = SmallRng::seed_from_u64(99);

        for code in [Some("SKU_Z"), Some(""), None] {
            for _ in 0..200 {
                let r = resolve(code, &segments, &mut rng).unwrap();
                assert!(r.index < segments.len());
                assert_eq!(r.outcome, ResolutionOutcome::Fallback);
            }
        }
    }

    #[test]
    fn fallback_is_deterministic_for_a_seed() {
        let segments = default_segments();
        let draw = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..20)
                .map(|_| resolve(None, &segments, &mut rng).unwrap().index)
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn fallback_is_roughly_uniform() {
        let segments = default_segments();
        let mut rng = SmallRng::seed_from_u64(2024);
        let mut counts = [0_u32; 6];
        let trials = 60_000;

        for _ in 0..trials {
            let r = resolve(Some("nope"), &segments, &mut rng).unwrap();
            counts[r.index] += 1;
        }

        // Expected 10_000 per bucket; allow a generous 5% band.
        for count in counts {
            assert!((9_500..=10_500).contains(&count), "{counts:?}");
        }
    }

    #[test]
    fn empty_segments_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(resolve(Some("SKU_A"), &[], &mut rng), Err(ResolveError::NoSegments));
    }

    #[test]
    fn single_segment_always_wins() {
        let segments = vec![Segment::new("ONLY", "T", "#1")];
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(resolve(None, &segments, &mut rng).unwrap().index, 0);
    }

    #[test]
    fn accepts_trait_object_rng() {
        let segments = default_segments();
        let mut rng: Box<dyn RngCore> = Box::new(SmallRng::seed_from_u64(5));

        let r = resolve(Some("sku_d"), &segments, rng.as_mut()).unwrap();
        assert_eq!(r.index, 3);

        let r = resolve(None, &segments, rng.as_mut()).unwrap();
        assert_eq!(r.outcome, ResolutionOutcome::Fallback);
        assert!(r.index < segments.len());
    }
}
