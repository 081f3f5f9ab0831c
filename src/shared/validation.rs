use rust_decimal::Decimal;
use validator::ValidationError;

/// Validate a latitude in signed decimal degrees (-90 to 90 inclusive)
pub fn validate_latitude(value: &Decimal) -> Result<(), ValidationError> {
    let ninety = Decimal::from(90);
    if *value < -ninety || *value > ninety {
        return Err(ValidationError::new("latitude_out_of_range"));
    }
    Ok(())
}

/// Validate a longitude in signed decimal degrees (-180 to 180 inclusive)
pub fn validate_longitude(value: &Decimal) -> Result<(), ValidationError> {
    let one_eighty = Decimal::from(180);
    if *value < -one_eighty || *value > one_eighty {
        return Err(ValidationError::new("longitude_out_of_range"));
    }
    Ok(())
}

/// Validate that a string is not blank after trimming.
/// Guest names like "   " must be rejected, not stored.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
