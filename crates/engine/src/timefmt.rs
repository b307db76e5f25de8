/// Formats seconds as `m:ss` with unpadded minutes and no hour rollover.
///
/// Negative and non-finite inputs clamp to zero.
///
/// # Example
/// ```
/// use engine::format_minutes;
///
/// assert_eq!(format_minutes(65.0), "1:05");
/// assert_eq!(format_minutes(3661.0), "61:01");
/// ```
pub fn format_minutes(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{}:{:02}", total / 60, total % 60)
}

/// Formats seconds as `h:mm:ss`, used for total-duration display.
pub fn format_hours(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

fn whole_seconds(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{format_hours, format_minutes};

    #[test]
    fn minutes_are_unpadded_and_seconds_zero_padded() {
        assert_eq!(format_minutes(65.0), "1:05");
        assert_eq!(format_minutes(0.0), "0:00");
        assert_eq!(format_minutes(3661.0), "61:01");
    }

    #[test]
    fn fractional_seconds_round_down() {
        assert_eq!(format_minutes(59.9), "0:59");
    }

    #[test]
    fn negative_and_non_finite_inputs_clamp_to_zero() {
        assert_eq!(format_minutes(-65.0), "0:00");
        assert_eq!(format_minutes(f64::NAN), "0:00");
        assert_eq!(format_minutes(f64::INFINITY), "0:00");
    }

    #[test]
    fn hours_roll_over() {
        assert_eq!(format_hours(3661.0), "1:01:01");
        assert_eq!(format_hours(65.0), "0:01:05");
    }
}
