// Exponential moving average smoothing

/// Highest weight a view may request; 100 would freeze every series at its first value.
pub const MAX_SMOOTHING_WEIGHT: u8 = 99;

/// Clamp a persisted smoothing value into the usable weight range.
pub fn clamp_weight(raw: i64) -> u8 {
    raw.clamp(0, MAX_SMOOTHING_WEIGHT as i64) as u8
}

/// Exponential moving average where `weight_percent` is the share given to history.
///
/// The first value passes through; every later value is rounded to four decimals
/// and the rounded value feeds the next step. A weight of 100 is accepted and
/// yields a constant series.
pub fn calc_ema(values: &[f64], weight_percent: u8) -> Vec<f64> {
    let alpha = f64::from(weight_percent.min(100)) / 100.0;
    let mut ema = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    if let Some(first) = iter.next() {
        ema.push(*first);
    }
    for value in iter {
        let previous = ema[ema.len() - 1];
        ema.push(round4(value * (1.0 - alpha) + previous * alpha));
    }

    ema
}

/// Round to 4 decimals from the exact binary value, ties away from zero.
///
/// `(v * 1e4).round()` rounds the already-rounded product instead, which moves
/// values such as 0.00035 (stored just below the midpoint) up a step.
fn round4(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let doubled = value.abs() * 20_000.0;
    let exact_tie = doubled.fract() == 0.0
        && doubled % 2.0 == 1.0
        && value.abs().mul_add(20_000.0, -doubled) == 0.0;
    if exact_tie {
        return ((doubled + 1.0) / 2.0 / 10_000.0).copysign(value);
    }
    format!("{:.4}", value).parse().unwrap_or(value)
}
