//! Level integrity fields
//!
//! Every level header stores four `f64` integrity values. The first is an
//! exact hash of the level geometry; the other three are random companions
//! that only have to keep their sum with the first inside fixed windows:
//!
//! | check | condition |
//! |---|---|
//! | hash | `abs(level_hash - integrity_1) < 1e-6` |
//! | 2 | `9786 <= integrity_1 + integrity_2 < 36546` |
//! | 3 | `9786 <= integrity_1 + integrity_3 < 36546` |
//! | 4 | `9875 <= integrity_1 + integrity_4 < 32345` |
//!
//! New companions are drawn as `uniform(base, base + range - 1) - integrity_1`
//! with `(base, range)` = `(11877, 5871)` for the second and third field and
//! `(12112, 6102)` for the fourth.

use crate::codec::FixedSize;
use crate::error::{FormatError, Result};
use crate::level::Level;
use crate::options::IntegrityPolicy;
use binrw::{BinRead, BinWrite};
use rand::RngExt;
use tracing::trace;

/// Multiplier applied to the geometry sum
pub const HASH_FACTOR: f64 = 3247.764325643;

/// Allowed drift between the stored and recomputed hash
pub const HASH_TOLERANCE: f64 = 0.000001;

/// Draw window `(base, range)` of the second and third field
pub const COMPANION_2_3: (i64, i64) = (11877, 5871);

/// Draw window `(base, range)` of the fourth field
pub const COMPANION_4: (i64, i64) = (12112, 6102);

/// Accepted half-open window of `integrity_1 + integrity_2/3`
pub const SUM_2_3: (f64, f64) = (9786.0, 36546.0);

/// Accepted half-open window of `integrity_1 + integrity_4`
pub const SUM_4: (f64, f64) = (9875.0, 32345.0);

/// The four integrity fields of a level header
#[derive(Debug, Clone, Copy, PartialEq, Default, BinRead, BinWrite)]
pub struct Integrity {
    /// Geometry hash
    pub integrity_1: f64,
    /// Random companion
    pub integrity_2: f64,
    /// Random companion
    pub integrity_3: f64,
    /// Random companion
    pub integrity_4: f64,
}

impl FixedSize for Integrity {
    const SIZE: usize = 4 * 8;
}

fn within((low, high): (f64, f64), value: f64) -> bool {
    low <= value && value < high
}

impl Integrity {
    /// Create from the four stored values
    pub const fn new(
        integrity_1: f64,
        integrity_2: f64,
        integrity_3: f64,
        integrity_4: f64,
    ) -> Self {
        Self {
            integrity_1,
            integrity_2,
            integrity_3,
            integrity_4,
        }
    }

    /// Fresh fields for `hash`, companions drawn from `rng`
    pub fn generate<G: rand::Rng + ?Sized>(hash: f64, rng: &mut G) -> Self {
        let mut draw =
            |(base, range): (i64, i64)| rng.random_range(base..base + range) as f64 - hash;
        Self {
            integrity_1: hash,
            integrity_2: draw(COMPANION_2_3),
            integrity_3: draw(COMPANION_2_3),
            integrity_4: draw(COMPANION_4),
        }
    }

    /// Whether the companions satisfy their windows relative to `integrity_1`
    pub fn companions_valid(&self) -> bool {
        within(SUM_2_3, self.integrity_1 + self.integrity_2)
            && within(SUM_2_3, self.integrity_1 + self.integrity_3)
            && within(SUM_4, self.integrity_1 + self.integrity_4)
    }

    /// Whether all four checks pass against `hash`
    pub fn is_valid(&self, hash: f64) -> bool {
        (hash - self.integrity_1).abs() < HASH_TOLERANCE && self.companions_valid()
    }

    /// Like [`is_valid`](Self::is_valid), naming the first failing check
    pub fn check(&self, hash: f64) -> Result<()> {
        if (hash - self.integrity_1).abs() >= HASH_TOLERANCE {
            return Err(FormatError::IntegrityCheckFailed(format!(
                "level hash {hash} does not match stored {}",
                self.integrity_1
            )));
        }
        let sums = [
            ("integrity_2", SUM_2_3, self.integrity_2),
            ("integrity_3", SUM_2_3, self.integrity_3),
            ("integrity_4", SUM_4, self.integrity_4),
        ];
        for (name, window, value) in sums {
            let sum = self.integrity_1 + value;
            if !within(window, sum) {
                return Err(FormatError::IntegrityCheckFailed(format!(
                    "integrity_1 + {name} = {sum} outside [{}, {})",
                    window.0, window.1
                )));
            }
        }
        Ok(())
    }

    /// Fields to store for a level whose hash is `hash`.
    ///
    /// `integrity_1` is always replaced by `hash`. Under
    /// [`IntegrityPolicy::PreserveValid`] the stored companions are kept when
    /// they still pass against the new hash.
    pub fn refresh<G: rand::Rng + ?Sized>(
        &self,
        hash: f64,
        policy: IntegrityPolicy,
        rng: &mut G,
    ) -> Self {
        let kept = Self {
            integrity_1: hash,
            ..*self
        };
        if policy == IntegrityPolicy::PreserveValid && kept.companions_valid() {
            return kept;
        }
        trace!(hash, "regenerating integrity companions");
        Self::generate(hash, rng)
    }
}

/// Exact geometry hash of `level`
pub fn level_hash(level: &Level) -> f64 {
    let mut sum = 0.0;
    for vertex in level.polygons.iter().flat_map(|p| &p.vertices) {
        sum += vertex.x + vertex.y;
    }
    for object in &level.objects {
        sum += object.x + object.y + f64::from(object.kind.code());
    }
    for picture in &level.pictures {
        sum += picture.x + picture.y;
    }
    sum * HASH_FACTOR
}

/// Whether the stored integrity fields of `level` pass every check
pub fn level_integrity(level: &Level) -> bool {
    level.header.integrity().is_valid(level_hash(level))
}

/// Validate the stored integrity fields of `level`
pub fn validate(level: &Level) -> Result<()> {
    level.header.integrity().check(level_hash(level))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::level::{Object, ObjectType, Polygon, Vertex};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn square_level() -> Level {
        let mut level = Level::default();
        level.polygons.push(Polygon::new(vec![
            Vertex::new(0.0, 0.0),
            Vertex::new(10.0, 0.0),
            Vertex::new(10.0, 10.0),
            Vertex::new(0.0, 10.0),
        ]));
        level.objects.extend([
            Object::new(2.0, 3.0, ObjectType::Start),
            Object::new(8.0, 3.0, ObjectType::Flower),
        ]);
        level
    }

    #[test]
    fn test_level_hash() {
        // vertices 40, objects (2+3+4) + (8+3+1)
        let expected = (40.0 + 9.0 + 12.0) * HASH_FACTOR;
        assert!((level_hash(&square_level()) - expected).abs() < 1e-9);
        assert_eq!(level_hash(&Level::default()), 0.0);
    }

    #[test]
    fn test_generated_fields_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let hash = level_hash(&square_level());
        let integrity = Integrity::generate(hash, &mut rng);
        assert_eq!(integrity.integrity_1, hash);
        assert!(integrity.is_valid(hash));
        integrity.check(hash).unwrap();
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = Integrity::generate(100.0, &mut StdRng::seed_from_u64(42));
        let b = Integrity::generate(100.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_check_reports_hash_mismatch() {
        let integrity = Integrity::generate(50.0, &mut StdRng::seed_from_u64(1));
        let err = integrity.check(50.1).unwrap_err();
        assert!(matches!(err, FormatError::IntegrityCheckFailed(msg) if msg.contains("hash")));
        assert!(!integrity.is_valid(50.1));
    }

    #[test]
    fn test_check_reports_companion_window() {
        let integrity = Integrity::new(0.0, 9785.0, 12000.0, 12000.0);
        let err = integrity.check(0.0).unwrap_err();
        assert!(
            matches!(err, FormatError::IntegrityCheckFailed(msg) if msg.contains("integrity_2"))
        );

        let integrity = Integrity::new(0.0, 12000.0, 12000.0, 32345.0);
        let err = integrity.check(0.0).unwrap_err();
        assert!(
            matches!(err, FormatError::IntegrityCheckFailed(msg) if msg.contains("integrity_4"))
        );
    }

    #[test]
    fn test_window_bounds() {
        assert!(Integrity::new(0.0, 9786.0, 36545.9, 9875.0).companions_valid());
        assert!(!Integrity::new(0.0, 36546.0, 12000.0, 12000.0).companions_valid());
        assert!(!Integrity::new(0.0, 12000.0, 12000.0, 9874.9).companions_valid());
    }

    #[test]
    fn test_refresh_preserves_valid_companions() {
        let stored = Integrity::new(10.0, 12000.0, 13000.0, 14000.0);
        let mut rng = StdRng::seed_from_u64(3);
        let refreshed = stored.refresh(20.0, IntegrityPolicy::PreserveValid, &mut rng);
        assert_eq!(refreshed, Integrity::new(20.0, 12000.0, 13000.0, 14000.0));

        let regenerated = stored.refresh(20.0, IntegrityPolicy::Regenerate, &mut rng);
        assert_eq!(regenerated.integrity_1, 20.0);
        assert!(regenerated.is_valid(20.0));
    }

    #[test]
    fn test_refresh_replaces_invalid_companions() {
        let stored = Integrity::new(0.0, 12000.0, 12000.0, 12000.0);
        let refreshed =
            stored.refresh(30000.0, IntegrityPolicy::PreserveValid, &mut StdRng::seed_from_u64(5));
        assert_ne!(refreshed.integrity_2, 12000.0);
        assert!(refreshed.is_valid(30000.0));
    }

    #[test]
    fn test_level_integrity_detects_perturbation() {
        let mut level = square_level();
        let integrity = Integrity::generate(level_hash(&level), &mut StdRng::seed_from_u64(9));
        level.header.set_integrity(integrity);
        assert!(level_integrity(&level));
        validate(&level).unwrap();

        level.polygons[0].vertices[1].x += 0.001;
        assert!(!level_integrity(&level));
        assert!(validate(&level).is_err());
    }

    proptest! {
        #[test]
        fn prop_generated_fields_always_valid(hash in -5000.0f64..5000.0, seed in any::<u64>()) {
            let integrity = Integrity::generate(hash, &mut StdRng::seed_from_u64(seed));
            prop_assert!(integrity.is_valid(hash));
        }
    }
}
