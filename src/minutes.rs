/// Converts an `mm:ss` minutes string to fractional minutes.
///
/// The stats API sometimes pads the minute part as `"34.000000:12"`; anything
/// that does not split into exactly two numeric parts yields `0.0`.
pub fn mmss_to_minutes(s: &str) -> f64 {
    let mut parts = s.trim().split(':');
    let (Some(m), Some(sec), None) = (parts.next(), parts.next(), parts.next()) else {
        return 0.0;
    };
    match (m.trim().parse::<f64>(), sec.trim().parse::<f64>()) {
        (Ok(m), Ok(sec)) if m.is_finite() && sec.is_finite() => m.trunc() + sec / 60.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_mmss() {
        assert_eq!(mmss_to_minutes("34:30"), 34.5);
        assert_eq!(mmss_to_minutes("0:00"), 0.0);
    }

    #[test]
    fn test_padded_minutes() {
        assert_eq!(mmss_to_minutes("22.000000:15"), 22.25);
    }

    #[test]
    fn test_malformed_is_zero() {
        assert_eq!(mmss_to_minutes(""), 0.0);
        assert_eq!(mmss_to_minutes("DNP"), 0.0);
        assert_eq!(mmss_to_minutes("34"), 0.0);
        assert_eq!(mmss_to_minutes("1:2:3"), 0.0);
    }
}
