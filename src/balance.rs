//! Majority-class downsampling.

use crate::error::{Result, SeizureError};
use crate::types::Dataset;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

/// Keep every minority-class row and an equally sized uniform sample (without
/// replacement) of majority-class rows.
///
/// Selected rows keep their original relative order. With `seed = None` the
/// generator is seeded from OS entropy and the result is not reproducible.
pub fn balance(dataset: &Dataset, seed: Option<u64>) -> Result<Dataset> {
    let (positive, negative): (Vec<usize>, Vec<usize>) =
        (0..dataset.len()).partition(|&i| dataset.labels()[i]);

    if positive.is_empty() || negative.is_empty() {
        return Err(SeizureError::EmptyClass(format!(
            "training data has {} seizure and {} non-seizure rows",
            positive.len(),
            negative.len()
        )));
    }

    let (minority, majority) = if positive.len() <= negative.len() {
        (positive, negative)
    } else {
        (negative, positive)
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            log::warn!("Balancing without a seed; the training subset is not reproducible");
            StdRng::from_os_rng()
        }
    };

    let picked = index::sample(&mut rng, majority.len(), minority.len());
    let mut selected: Vec<usize> = minority;
    selected.extend(picked.into_iter().map(|i| majority[i]));
    selected.sort_unstable();

    log::info!(
        "Balanced training set: {} rows per class ({} rows dropped)",
        selected.len() / 2,
        dataset.len() - selected.len()
    );

    Ok(dataset.select(&selected))
}
