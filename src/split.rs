//! Leave-one-subject-out partitioning.

use crate::error::{Result, SeizureError};
use crate::types::Dataset;

/// Train and test partitions of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Hold out every row of `test_subject` as the test set.
///
/// Row order is preserved within both partitions. Fails with
/// `UnknownSubject` if no row belongs to `test_subject`.
pub fn leave_one_subject_out(dataset: &Dataset, test_subject: &str) -> Result<Split> {
    let (test_idx, train_idx): (Vec<usize>, Vec<usize>) =
        (0..dataset.len()).partition(|&i| dataset.subjects()[i] == test_subject);

    if test_idx.is_empty() {
        return Err(SeizureError::UnknownSubject(test_subject.to_string()));
    }

    log::info!(
        "Held out subject '{}': {} train rows, {} test rows",
        test_subject,
        train_idx.len(),
        test_idx.len()
    );

    Ok(Split {
        train: dataset.select(&train_idx),
        test: dataset.select(&test_idx),
    })
}
