//! Seeded row sampling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;

/// Draw `max_samples` of `len` indices without replacement, sorted ascending.
///
/// Returns None when no sampling is needed. The same seed always yields the
/// same indices.
pub fn sample_indices(len: usize, max_samples: Option<usize>, seed: u64) -> Option<Vec<usize>> {
    let max_samples = max_samples?;
    if max_samples == 0 || len <= max_samples {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = index::sample(&mut rng, len, max_samples).into_vec();
    picked.sort_unstable();
    Some(picked)
}
