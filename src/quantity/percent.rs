use crate::prelude::*;

quantity!(Percent, "%", 1);

impl Percent {
    pub const HUNDRED: Self = Self(100.0);

    /// Share of `part` in `total`, or 100% for an empty total.
    #[expect(clippy::cast_precision_loss)]
    pub fn of_total(part: usize, total: usize) -> Self {
        if total == 0 { Self::HUNDRED } else { Self(part as f64 / total as f64 * 100.0) }
    }

    /// Apply the percentage to a count, for example, to get the target number of vehicles.
    #[expect(clippy::cast_precision_loss)]
    pub fn apply_to(self, total: usize) -> f64 {
        self.0 / 100.0 * total as f64
    }
}

/// Parse a percentage between 0 and 100 inclusive.
pub fn parse_bounded(s: &str) -> Result<Percent> {
    let percent: Percent = s.trim().parse().with_context(|| format!("`{s}` is not a number"))?;
    ensure!((0.0..=100.0).contains(&percent.0), "`{s}` is not between 0 and 100");
    Ok(percent)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn of_total_ok() {
        assert_abs_diff_eq!(Percent::of_total(9, 10).0, 90.0);
        assert_abs_diff_eq!(Percent::of_total(0, 4).0, 0.0);
    }

    #[test]
    fn of_empty_total_is_hundred() {
        assert_eq!(Percent::of_total(0, 0), Percent::HUNDRED);
    }

    #[test]
    fn apply_to_ok() {
        assert_abs_diff_eq!(Percent(85.0).apply_to(20), 17.0);
    }

    #[test]
    fn parse_bounded_ok() -> Result {
        assert_abs_diff_eq!(parse_bounded("90")?.0, 90.0);
        assert_abs_diff_eq!(parse_bounded(" 0 ")?.0, 0.0);
        assert_abs_diff_eq!(parse_bounded("100")?.0, 100.0);
        Ok(())
    }

    #[test]
    fn parse_bounded_out_of_range_fails() {
        assert!(parse_bounded("nan").is_err());
        assert!(parse_bounded("-1").is_err());
        assert!(parse_bounded("100.5").is_err());
        assert!(parse_bounded("inf").is_err());
        assert!(parse_bounded("ninety").is_err());
    }

    #[test]
    fn display_ok() {
        assert_eq!(Percent(98.75).to_string(), "98.8%");
    }
}
