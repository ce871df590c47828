/// Symmetric cubic ease, slow at both ends. Input is clamped to `[0, 1]`.
#[must_use]
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::cubic_in_out;

    #[test]
    fn endpoints_and_midpoint() {
        assert_eq!(cubic_in_out(0.0), 0.0);
        assert_eq!(cubic_in_out(1.0), 1.0);
        assert!((cubic_in_out(0.5) - 0.5).abs() <= 1e-12);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(cubic_in_out(-3.0), 0.0);
        assert_eq!(cubic_in_out(7.0), 1.0);
    }

    #[test]
    fn monotonic_over_unit_interval() {
        let mut previous = 0.0;
        for i in 1..=100 {
            let value = cubic_in_out(f64::from(i) / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }
}
