//! Check-digit arithmetic for government reference-number formats

/// Weights applied to digits 2-10 of a ten-digit tax reference.
const TAX_REFERENCE_WEIGHTS: [u32; 9] = [6, 7, 8, 9, 10, 5, 4, 3, 2];

/// Weights applied to all fourteen characters of a duty reference.
/// The leading prefix character and the check character itself carry no
/// weight.
const EXCISE_REFERENCE_WEIGHTS: [u32; 14] = [0, 0, 9, 10, 11, 12, 13, 8, 7, 6, 5, 4, 3, 2];

/// Check-character alphabet indexed by the weighted sum mod 23.
const EXCISE_CHECK_ALPHABET: &[u8; 23] = b"ABCDEFGHXJKLMNYPQRSTZVW";

/// Weights applied to digits 1-7 of a nine-digit VAT registration number.
const VAT_REGISTRATION_WEIGHTS: [u32; 7] = [8, 7, 6, 5, 4, 3, 2];

/// Computes the check digit for the nine base digits of a tax reference
/// (digits 2-10 of the full value). Returns `None` unless given exactly nine
/// decimal digits.
///
/// The weighted sum is reduced mod 11, subtracted from 11, and folded back
/// under 10 by subtracting 9. The result is always in `1..=9`.
pub fn tax_reference_check_digit(base: &str) -> Option<u32> {
    if base.len() != 9 || !base.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let sum: u32 = base
        .bytes()
        .zip(TAX_REFERENCE_WEIGHTS)
        .map(|(byte, weight)| u32::from(byte - b'0') * weight)
        .sum();

    let mut check = 11 - sum % 11;

    if check > 9 {
        check -= 9;
    }

    Some(check)
}

/// Validates a ten-digit tax reference: the first digit must equal the check
/// digit computed over the remaining nine.
pub fn is_valid_tax_reference(value: &str) -> bool {
    if value.len() != 10 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let leading = u32::from(value.as_bytes()[0] - b'0');

    tax_reference_check_digit(&value[1..]) == Some(leading)
}

/// Letter positions carry the codes 33 (A) through 58 (Z).
fn excise_character_code(byte: u8) -> u32 {
    if byte.is_ascii_uppercase() {
        33 + u32::from(byte - b'A')
    } else {
        u32::from(byte - b'0')
    }
}

/// True when the upper-cased value has the duty-reference shape: `X`, a
/// letter other than I, O or U, `M`, then eleven digits.
fn is_excise_reference_format(value: &str) -> bool {
    let bytes = value.as_bytes();

    bytes.len() == 14
        && bytes[0] == b'X'
        && matches!(bytes[1], b'A'..=b'H' | b'J'..=b'N' | b'P'..=b'T' | b'V'..=b'Z')
        && bytes[2] == b'M'
        && bytes[3..].iter().all(|b| b.is_ascii_digit())
}

/// Computes the expected check character for a duty reference of valid
/// format. The character in the check position has zero weight, so a value
/// carrying a wrong check character still yields the right expectation.
pub fn excise_reference_check_character(value: &str) -> Option<char> {
    if !is_excise_reference_format(value) {
        return None;
    }

    let sum: u32 = value
        .bytes()
        .zip(EXCISE_REFERENCE_WEIGHTS)
        .map(|(byte, weight)| excise_character_code(byte) * weight)
        .sum();

    Some(char::from(EXCISE_CHECK_ALPHABET[(sum % 23) as usize]))
}

/// Validates a fourteen-character duty reference. Case-insensitive; an empty
/// value is valid, a value of the wrong shape is not.
pub fn is_valid_excise_reference(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    if value.len() != 14 {
        return false;
    }

    let mut upper = [0u8; 14];

    for (slot, byte) in upper.iter_mut().zip(value.bytes()) {
        *slot = byte.to_ascii_uppercase();
    }

    let upper = match core::str::from_utf8(&upper) {
        Ok(upper) => upper,
        Err(_) => return false,
    };

    match excise_reference_check_character(upper) {
        Some(expected) => upper.as_bytes()[1] == expected as u8,
        None => false,
    }
}

fn vat_checksum_matches(total: u32, check: u32) -> bool {
    let modulus = total % 97;
    let checksum = if modulus == 0 { 0 } else { 97 - modulus };
    check == checksum
}

/// Validates a nine-digit VAT registration number. The last two digits must
/// equal 97 minus the weighted sum of the first seven mod 97, tried against
/// both the raw sum and the sum plus 55 for the later numbering era. Empty
/// values are valid.
pub fn is_valid_vat_registration(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }

    if value.len() != 9 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let check: u32 = value[7..].parse().unwrap_or(0);

    let total: u32 = value
        .bytes()
        .zip(VAT_REGISTRATION_WEIGHTS)
        .map(|(byte, weight)| u32::from(byte - b'0') * weight)
        .sum();

    vat_checksum_matches(total, check) || vat_checksum_matches(total + 55, check)
}
