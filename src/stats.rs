/// Arithmetic mean of a sequence. An empty sequence yields NaN.
pub fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population standard deviation of a sequence
pub fn std_dev(values: &[f32]) -> f32 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}
