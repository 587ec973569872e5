//! Arithmetic mean of mark values.

/// Mean of `values`, or `None` when there is nothing to average.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
