/// Format a number with at least 9 digits, in groups of 3 separated by `_`,
/// e.g., `000_001_024`.
pub(crate) fn format_pad9_u64(n: u64) -> String {
    let digits = format!("{:09}", n);
    let first = digits.len() % 3;

    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    if first > 0 {
        groups.push(&digits[..first]);
    }
    for i in (first..digits.len()).step_by(3) {
        groups.push(&digits[i..i + 3]);
    }

    groups.join("_")
}

#[cfg(test)]
mod tests {
    use super::format_pad9_u64;

    #[test]
    fn test_format_pad9_u64() {
        assert_eq!(format_pad9_u64(0), "000_000_000");
        assert_eq!(format_pad9_u64(120_000), "000_120_000");
        assert_eq!(format_pad9_u64(1_200_000_000), "1_200_000_000");
        assert_eq!(format_pad9_u64(u64::MAX), "18_446_744_073_709_551_615");
    }
}
