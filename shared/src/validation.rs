//! Input validation helpers shared by backend services

use rust_decimal::Decimal;

/// Validate a weight entered for consumption or purchase (must be > 0).
pub fn validate_positive_weight(weight_kg: Decimal) -> Result<(), &'static str> {
    if weight_kg <= Decimal::ZERO {
        return Err("Weight must be greater than zero");
    }
    Ok(())
}

/// Validate a money amount that may be zero (tax, discount, price).
pub fn validate_non_negative_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a piece count for tracking records (zero is allowed).
pub fn validate_non_negative_pieces(pieces: i64) -> Result<(), &'static str> {
    if pieces < 0 {
        return Err("Piece count cannot be negative");
    }
    Ok(())
}

/// Validate a phone number (digits with optional leading +, 7-15 digits).
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !(7..=15).contains(&digits.len()) {
        return Err("Phone number must have 7 to 15 digits");
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must contain only digits");
    }
    Ok(())
}

/// Validate a product SKU (non-empty, at most 32 chars, no whitespace).
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.is_empty() {
        return Err("SKU cannot be empty");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if sku.chars().any(|c| c.is_whitespace()) {
        return Err("SKU cannot contain whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_weight() {
        assert!(validate_positive_weight("0.01".parse().unwrap()).is_ok());
        assert!(validate_positive_weight(Decimal::ZERO).is_err());
        assert!(validate_positive_weight("-2".parse().unwrap()).is_err());
    }

    #[test]
    fn test_pieces() {
        assert!(validate_non_negative_pieces(0).is_ok());
        assert!(validate_non_negative_pieces(40).is_ok());
        assert!(validate_non_negative_pieces(-1).is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+919876543210").is_ok());
        assert!(validate_phone("9876543210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("98-76-54").is_err());
    }

    #[test]
    fn test_sku() {
        assert!(validate_sku("CHK-CURRY-01").is_ok());
        assert!(validate_sku("").is_err());
        assert!(validate_sku("HAS SPACE").is_err());
    }
}
