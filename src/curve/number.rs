/// Largest precision the exporter accepts
pub const MAX_PRECISION: u32 = 21;

/// Round to `precision` decimal digits.
///
/// Rounding works on the exact decimal expansion of `value`, so a value
/// that is exactly halfway goes to the even digit (`0.125` -> `0.12`,
/// `2.5` -> `2`). The result is the nearest f64 to the rounded decimal.
pub fn round_to(value: f64, precision: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }

    format!("{:.*}", precision as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Format a number as plain decimal, treating -0 as 0
pub fn fmt_num(n: f64) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to(1.23456, 4), 1.2346);
        assert_eq!(round_to(1.23454, 4), 1.2345);
        assert_eq!(round_to(-1.6, 0), -2.0);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(0.03125, 4), 0.0312);
    }

    #[test]
    fn test_round_to_uses_exact_decimal_value() {
        // 2.675 is stored as 2.67499999...
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(1.0e-5, 4), 0.0);
    }

    #[test]
    fn test_round_to_huge_precision_keeps_value() {
        assert_eq!(round_to(0.1, 21), 0.1);
        assert_eq!(round_to(12345.678, 21), 12345.678);
        assert_eq!(round_to(1e300, 21), 1e300);
        assert!(round_to(f64::NAN, 4).is_nan());
        assert_eq!(round_to(f64::INFINITY, 4), f64::INFINITY);
    }

    #[test]
    fn test_fmt_num_plain_decimal() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(-1.5), "-1.5");
        assert_eq!(fmt_num(0.00001), "0.00001");
        assert_eq!(fmt_num(1e21), "1000000000000000000000");
    }

    #[test]
    fn test_rounding_never_adds_digits() {
        assert_eq!(fmt_num(round_to(0.1 + 0.2, 4)), "0.3");
        assert_eq!(fmt_num(round_to(2.0 / 3.0, 2)), "0.67");
        assert_eq!(fmt_num(round_to(-0.00001, 4)), "0");
    }
}
