/// Render remaining time as `MM:SS`.
///
/// Sub-second remainders are truncated. Minutes are not capped, so a phase
/// longer than 99 minutes renders with three digits.
pub fn format_remaining(remaining_ms: u64) -> String {
    let secs = remaining_ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_values() {
        assert_eq!(format_remaining(125_000), "02:05");
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(1_500_000), "25:00");
        assert_eq!(format_remaining(300_000), "05:00");
    }

    #[test]
    fn truncates_partial_seconds() {
        assert_eq!(format_remaining(59_999), "00:59");
        assert_eq!(format_remaining(999), "00:00");
    }

    #[test]
    fn long_phases_keep_counting_minutes() {
        assert_eq!(format_remaining(100 * 60 * 1000), "100:00");
    }

    proptest! {
        #[test]
        fn display_parses_back_to_whole_seconds(ms in 0u64..(99 * 60 * 1000)) {
            let s = format_remaining(ms);
            prop_assert_eq!(s.len(), 5);
            let (mm, ss) = s.split_once(':').unwrap();
            let mm: u64 = mm.parse().unwrap();
            let ss: u64 = ss.parse().unwrap();
            prop_assert!(ss < 60);
            prop_assert_eq!(mm * 60 + ss, ms / 1000);
        }
    }
}
