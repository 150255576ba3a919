use crate::domain::model::{MAX_GUESTS, MIN_GUESTS};
use crate::utils::error::{BookingError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> BookingError {
    BookingError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// An absolute `http`/`https` address with a host, such as the reservation
/// service endpoint or a receipt link.
pub fn validate_http_url(field: &str, raw: &str) -> Result<()> {
    if raw.trim().is_empty() {
        return Err(invalid(field, raw, "URL cannot be empty"));
    }

    let url = Url::parse(raw).map_err(|e| invalid(field, raw, format!("Invalid URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            raw,
            format!("Expected http or https, got {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(field, raw, "URL has no host"));
    }
    Ok(())
}

/// Nightly rates are whole currency units; a free night is a configuration
/// mistake.
pub fn validate_rate(field: &str, amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(invalid(field, amount, "Rate must be greater than zero"));
    }
    Ok(())
}

pub fn validate_guest_count(field: &str, guests: u8) -> Result<()> {
    if !(MIN_GUESTS..=MAX_GUESTS).contains(&guests) {
        return Err(invalid(
            field,
            guests,
            format!("Guest count must be between {} and {}", MIN_GUESTS, MAX_GUESTS),
        ));
    }
    Ok(())
}

pub fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, value, "Value cannot be blank"));
    }
    Ok(())
}
