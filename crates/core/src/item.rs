//! Catalog item rules: field validation.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Maximum allowed length for an item name.
pub const MAX_ITEM_NAME_LENGTH: usize = 160;

/// Maximum allowed length for an item description.
pub const MAX_ITEM_DESCRIPTION_LENGTH: usize = 10_000;

/// Validate an item name: non-empty, trimmed, within
/// [`MAX_ITEM_NAME_LENGTH`].
pub fn validate_item_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidArgument(
            "Item name must not be empty".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::InvalidArgument(
            "Item name must not have leading or trailing whitespace".to_string(),
        ));
    }
    if name.len() > MAX_ITEM_NAME_LENGTH {
        return Err(CoreError::InvalidArgument(format!(
            "Item name must not exceed {MAX_ITEM_NAME_LENGTH} characters, got {}",
            name.len()
        )));
    }
    Ok(())
}

/// Validate an optional item description against
/// [`MAX_ITEM_DESCRIPTION_LENGTH`].
pub fn validate_item_description(description: Option<&str>) -> Result<(), CoreError> {
    if let Some(text) = description {
        if text.len() > MAX_ITEM_DESCRIPTION_LENGTH {
            return Err(CoreError::InvalidArgument(format!(
                "Item description must not exceed {MAX_ITEM_DESCRIPTION_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate item prices: both the price and the promo price, when present,
/// must be non-negative.
pub fn validate_item_prices(price: Decimal, promo_price: Option<Decimal>) -> Result<(), CoreError> {
    if price.is_sign_negative() {
        return Err(CoreError::InvalidArgument(
            "Item price must not be negative".to_string(),
        ));
    }
    if let Some(promo) = promo_price {
        if promo.is_sign_negative() {
            return Err(CoreError::InvalidArgument(
                "Item promo price must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn valid_item_fields_pass() {
        assert!(validate_item_name("Cola 0.5l").is_ok());
        assert!(validate_item_description(Some("Cold and fizzy")).is_ok());
        assert!(validate_item_description(None).is_ok());
        assert!(validate_item_prices(Decimal::new(1250, 2), Some(Decimal::new(990, 2))).is_ok());
    }

    #[test]
    fn blank_or_untrimmed_names_are_rejected() {
        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("  ").is_err());
        assert!(validate_item_name(" Cola").is_err());
    }

    #[test]
    fn negative_prices_are_rejected() {
        assert!(validate_item_prices(Decimal::new(-1, 0), None).is_err());
        assert!(validate_item_prices(Decimal::ONE, Some(Decimal::new(-1, 0))).is_err());
    }

    #[test]
    fn zero_price_is_allowed() {
        assert!(validate_item_prices(Decimal::ZERO, Some(Decimal::ZERO)).is_ok());
    }
}
