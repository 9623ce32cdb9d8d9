//! Engineering notation.

const PREFIXES: [(i32, &str); 11] = [
    (-18, "a"),
    (-15, "f"),
    (-12, "p"),
    (-9, "n"),
    (-6, "u"),
    (-3, "m"),
    (0, ""),
    (3, "k"),
    (6, "M"),
    (9, "G"),
    (12, "T"),
];

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Formats `value` with an SI prefix, keeping at most 6 decimals of the mantissa.
///
/// # Example
///
/// ```
/// # use schematic::si_string;
/// assert_eq!(si_string(1e-9), "1n");
/// assert_eq!(si_string(2.5e-13), "250f");
/// assert_eq!(si_string(4700.), "4.7k");
/// assert_eq!(si_string(0.), "0");
/// ```
pub fn si_string(value: f64) -> String {
    if value == 0. || !value.is_finite() {
        return format!("{value}");
    }
    let (min_exp, max_exp) = (PREFIXES[0].0, PREFIXES[PREFIXES.len() - 1].0);
    let mut exp = ((value.abs().log10() / 3.).floor() as i32 * 3).clamp(min_exp, max_exp);
    let mut mantissa = round6(value / 10f64.powi(exp));
    if mantissa.abs() >= 1000. && exp < max_exp {
        exp += 3;
        mantissa = round6(value / 10f64.powi(exp));
    } else if mantissa.abs() < 1. && exp > min_exp {
        exp -= 3;
        mantissa = round6(value / 10f64.powi(exp));
    }
    let prefix = PREFIXES
        .iter()
        .find(|(e, _)| *e == exp)
        .map(|(_, p)| *p)
        .unwrap_or_default();
    format!("{mantissa}{prefix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_large_values() {
        assert_eq!(si_string(-3.3e-6), "-3.3u");
        assert_eq!(si_string(1e6), "1M");
        assert_eq!(si_string(1e15), "1000T");
        assert_eq!(si_string(123.456789), "123.456789");
    }
}
