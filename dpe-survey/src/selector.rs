//! Random sample selection
//!
//! Picks a uniformly random catalog sample, optionally filtered by genre.
//! Callers re-invoke [`pick`] only when no sample is active or the genre
//! filter changed; the selection itself is stateless.

use crate::catalog::{Sample, ANY_GENRE};
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick a uniformly random sample matching `genre_filter`
///
/// A filter of [`ANY_GENRE`] passes the whole catalog through. An empty
/// filtered set is an explicit error, never a panic.
pub fn pick<'a>(
    samples: &'a [Sample],
    genre_filter: &str,
    rng: &mut impl Rng,
) -> Result<&'a Sample> {
    let candidates: Vec<&Sample> = samples
        .iter()
        .filter(|sample| genre_filter == ANY_GENRE || sample.genre == genre_filter)
        .collect();

    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| Error::EmptyCatalog {
            genre: genre_filter.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(rel_path: &str) -> Sample {
        Sample::from_rel_path(rel_path).unwrap()
    }

    fn catalog() -> Vec<Sample> {
        vec![
            sample("rock/training/1.wav"),
            sample("jazz/generated/2.wav"),
            sample("rock/generated/3.wav"),
        ]
    }

    #[test]
    fn test_single_match_filter() {
        let samples = vec![sample("rock/training/1.wav"), sample("jazz/generated/2.wav")];
        let mut rng = StdRng::seed_from_u64(7);

        let picked = pick(&samples, "jazz", &mut rng).unwrap();
        assert_eq!(picked.rel_path, "jazz/generated/2.wav");
    }

    #[test]
    fn test_filter_returns_only_matching_genre() {
        let samples = catalog();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let picked = pick(&samples, "rock", &mut rng).unwrap();
            assert_eq!(picked.genre, "rock");
        }
    }

    #[test]
    fn test_any_genre_passes_everything_through() {
        let samples = catalog();
        let mut rng = StdRng::seed_from_u64(3);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let picked = pick(&samples, ANY_GENRE, &mut rng).unwrap();
            seen.insert(picked.rel_path.clone());
        }
        // Uniform selection over a 3-element catalog reaches all of them
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_empty_filtered_set_is_an_error() {
        let samples = catalog();
        let mut rng = StdRng::seed_from_u64(1);

        let result = pick(&samples, "polka", &mut rng);
        assert!(matches!(result, Err(Error::EmptyCatalog { genre }) if genre == "polka"));
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let samples: Vec<Sample> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(pick(&samples, ANY_GENRE, &mut rng).is_err());
    }
}
