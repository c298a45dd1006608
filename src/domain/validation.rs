use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be between {min} and {max} characters")]
    Length { field: &'static str, min: usize, max: usize },
    #[error("{field} must be a valid email address")]
    Email { field: &'static str },
    #[error("{field} is out of range: {reason}")]
    Range { field: &'static str, reason: String },
    #[error("{0}")]
    Invalid(String),
}

/// Checks that `value` is non-blank and its length in characters lies in `min..=max`.
///
/// # Errors
/// Returns `ValidationError::Empty` for blank input and `ValidationError::Length` when out of bounds.
pub fn require_len(field: &'static str, value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    if min > 0 && value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

/// # Errors
/// Returns `ValidationError::Empty` if `value` is blank.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Accepts `local@domain.tld` shaped addresses without whitespace.
///
/// # Errors
/// Returns `ValidationError::Email` for anything else.
pub fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let err = || ValidationError::Email { field };
    if value.len() > 254 || value.chars().any(char::is_whitespace) {
        return Err(err());
    }
    let (local, domain) = value.split_once('@').ok_or_else(err)?;
    if local.is_empty() || domain.contains('@') {
        return Err(err());
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(err());
    };
    if host.is_empty() || tld.is_empty() || host.starts_with('.') || host.ends_with('.') {
        return Err(err());
    }
    Ok(())
}

/// Validates an optional field only when present.
///
/// # Errors
/// Propagates the error from `check`.
pub fn optional<T: ?Sized>(
    value: Option<&T>,
    check: impl FnOnce(&T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), check)
}

/// # Errors
/// Returns `ValidationError::Empty` naming the first blank entry.
pub fn require_entries(field: &'static str, values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
