//! Payment-card checksum (Luhn)

/// Validates a payment-card number with the Luhn algorithm.
///
/// Every second digit counting from the right is doubled (parity taken from
/// the total digit count), doubled digits above 9 have 9 subtracted, and the
/// digit sum must be a non-zero multiple of 10. An empty value is valid; the
/// absence-of-value policy belongs to the `required` rule, not this one.
pub fn is_valid_payment_card(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let parity = value.len() % 2;
    let mut sum = 0u32;

    for (index, byte) in value.bytes().enumerate() {
        let mut digit = u32::from(byte - b'0');

        if index % 2 == parity {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }

        sum += digit;
    }

    sum != 0 && sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_card_numbers() {
        assert!(is_valid_payment_card("4532015112830366"));
        assert!(is_valid_payment_card("79927398713"));
        assert!(is_valid_payment_card("4111111111111111"));
    }

    #[test]
    fn test_single_digit_mutation_fails() {
        assert!(!is_valid_payment_card("4532015112830367"));
        assert!(!is_valid_payment_card("4532015112830365"));
        assert!(!is_valid_payment_card("5532015112830366"));
    }

    #[test]
    fn test_empty_is_valid() {
        assert!(is_valid_payment_card(""));
    }

    #[test]
    fn test_all_zero_sum_is_invalid() {
        assert!(!is_valid_payment_card("0"));
        assert!(!is_valid_payment_card("0000"));
    }

    #[test]
    fn test_non_digits_are_invalid() {
        assert!(!is_valid_payment_card("4532 0151 1283 0366"));
        assert!(!is_valid_payment_card("4532O15112830366"));
    }

    #[test]
    fn test_odd_length_parity() {
        // 11 digits: doubling starts from the second digit on the left.
        assert!(is_valid_payment_card("79927398713"));
        assert!(!is_valid_payment_card("79927398712"));
    }
}
