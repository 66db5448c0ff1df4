//! CPF checksum validation.
//!
//! A CPF is an 11-digit identifier whose last two digits are check digits
//! computed by a weighted sum over the preceding digits.

use crate::error::{OrdemError, Result};

/// Validate a CPF candidate and return it normalized to its 11 digits.
///
/// Formatting characters (dots, dashes, spaces) are stripped before
/// validation, so "401.853.320-99" and "40185332099" are equivalent.
pub fn validate_cpf(candidate: &str) -> Result<String> {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return Err(OrdemError::validation("cpf", "must contain 11 digits"));
    }

    // All-same-digit strings pass the checksum but are known-invalid
    if digits.iter().all(|&d| d == digits[0]) {
        return Err(OrdemError::validation("cpf", "repeated digits"));
    }

    if check_digit(&digits[..9], 10) != digits[9] {
        return Err(OrdemError::validation("cpf", "check digit 1 mismatch"));
    }

    if check_digit(&digits[..10], 11) != digits[10] {
        return Err(OrdemError::validation("cpf", "check digit 2 mismatch"));
    }

    Ok(digits.iter().map(|d| d.to_string()).collect())
}

/// Weighted sum with weights descending from `first_weight` to 2,
/// then (sum * 10) mod 11, with 10 mapped to 0.
fn check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| d * (first_weight - i as u32))
        .sum();

    let result = (sum * 10) % 11;
    if result == 10 {
        0
    } else {
        result
    }
}
