/// Finite minimum and maximum of `values`, skipping NaN and infinities.
pub(crate) fn min_max<'a>(values: impl IntoIterator<Item = &'a f32>) -> Option<(f32, f32)> {
    let mut iter = values.into_iter().copied().filter(|value| value.is_finite());
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for value in iter {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    Some((min, max))
}

pub(crate) fn shape3(shape: &[usize]) -> Option<[usize; 3]> {
    match shape {
        [depth, height, width] => Some([*depth, *height, *width]),
        _ => None,
    }
}
