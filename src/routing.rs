//! ABA routing number helpers.

/// Computes the check digit for an 8-digit DFI identifier.
///
/// Returns `None` if the input is not exactly 8 ASCII digits.
pub fn check_digit(dfi: &str) -> Option<u8> {
    let digits = digits_of(dfi, 8)?;
    let sum = 7 * (digits[0] + digits[3] + digits[6])
        + 3 * (digits[1] + digits[4] + digits[7])
        + 9 * (digits[2] + digits[5]);
    Some((sum % 10) as u8)
}

/// Appends the computed check digit to an 8-digit DFI identifier.
pub fn with_check_digit(dfi: &str) -> Option<String> {
    check_digit(dfi).map(|digit| format!("{}{}", dfi, digit))
}

/// Returns `true` if a 9-digit routing number carries a correct check digit.
pub fn is_valid(routing: &str) -> bool {
    match digits_of(routing, 9) {
        Some(digits) => check_digit(&routing[..8]) == Some(digits[8] as u8),
        None => false,
    }
}

/// Integer value of the first 8 digits, used for entry hash totals.
pub fn dfi_identifier(routing: &str) -> u64 {
    routing
        .bytes()
        .take(8)
        .filter(u8::is_ascii_digit)
        .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
}

fn digits_of(s: &str, len: usize) -> Option<Vec<u32>> {
    if s.len() != len {
        return None;
    }
    s.chars().map(|c| c.to_digit(10)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit_known_routing_numbers() {
        assert_eq!(check_digit("09100001"), Some(9));
        assert_eq!(check_digit("01140153"), Some(3));
        assert_eq!(with_check_digit("09100001").as_deref(), Some("091000019"));
    }

    #[test]
    fn test_check_digit_rejects_bad_input() {
        assert_eq!(check_digit("0910000"), None);
        assert_eq!(check_digit("0910000a"), None);
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("091000019"));
        assert!(is_valid("011401533"));
        assert!(!is_valid("091000018"));
        assert!(!is_valid("09100001"));
    }

    #[test]
    fn test_dfi_identifier() {
        assert_eq!(dfi_identifier("091000019"), 9_100_001);
        assert_eq!(dfi_identifier("999999999"), 99_999_999);
    }
}
